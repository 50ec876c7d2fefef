use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::metrics::{compute_metrics, filter_options, MetricFilter, MetricsOutcome};
use crate::state::AppState;

/// GET /api/filters
pub async fn handle_filters(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, AppError> {
    let dataset = state.dataset.clone();
    let options = tokio::task::spawn_blocking(move || filter_options(&dataset))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(options))
}

/// GET /api/metrics?dept=&country=&gender=&job=
/// Full-table scan per request, so the work runs on the blocking pool.
pub async fn handle_metrics(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<MetricsOutcome>, AppError> {
    let Query(pairs) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let filter = MetricFilter::from_pairs(pairs);
    tracing::debug!(?filter, "computing metrics");
    let dataset = state.dataset.clone();
    let outcome = tokio::task::spawn_blocking(move || compute_metrics(&dataset, &filter))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(outcome))
}
