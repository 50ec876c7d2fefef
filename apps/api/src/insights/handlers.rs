use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::fallback::{fallback_insight, fallback_narrative};
use crate::insights::models::{
    AiInsightQuery, AiInsightResponse, ClusterInsight, Generated, InsightRequest,
    NarrativeRequest, NarrativeSet, MAX_NARRATIVE_METRICS,
};
use crate::insights::prompts;
use crate::llm_client::LlmError;
use crate::state::AppState;

/// Short id to correlate the log lines of one AI request.
fn request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// GET /api/ai-insight?query=&current_metrics=
/// LLM failures still answer 200 with an "Analysis failed" insight.
pub async fn handle_ai_insight(
    State(state): State<AppState>,
    query: Result<Query<AiInsightQuery>, QueryRejection>,
) -> Result<Json<AiInsightResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let req_id = request_id();
    info!("[ai-insight:{req_id}] start model={}", state.llm.model());

    let user = prompts::ai_insight_user_message(&params.query, &params.current_metrics);
    let insight = match state
        .llm
        .chat(prompts::AI_INSIGHT_SYSTEM, &user, prompts::AI_INSIGHT_TEMPERATURE)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("[ai-insight:{req_id}] LLM call failed: {e}");
            format!("Analysis failed: {}", e.public_message())
        }
    };

    Ok(Json(AiInsightResponse { insight }))
}

/// POST /api/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    body: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<Generated<ClusterInsight>>, AppError> {
    let Json(req) = body.map_err(|e| {
        AppError::Validation(format!("Invalid insights request payload: {}", e.body_text()))
    })?;
    let req_id = request_id();
    let metrics = req
        .metric_snapshot
        .as_ref()
        .map(|s| s.metrics.as_slice())
        .unwrap_or_default();

    info!(
        "[insights:{req_id}] start model={} cluster={} metrics={}",
        state.llm.model(),
        req.active_cluster.as_deref().unwrap_or("unknown"),
        metrics.len()
    );

    let context = json!({
        "activeCluster": req.active_cluster,
        "filters": req.filters,
        "metricSnapshot": req.metric_snapshot,
        "insightContext": req.insight_context,
    });

    let result = state
        .llm
        .chat_json::<ClusterInsight>(
            &prompts::insights_system(),
            &prompts::insights_prompt(&context),
            prompts::INSIGHTS_TEMPERATURE,
        )
        .await
        .and_then(|insight| validated(insight, ClusterInsight::validate));

    match result {
        Ok(insight) => Ok(Json(Generated::llm(insight, state.llm.model()))),
        Err(e) => {
            warn!("[insights:{req_id}] falling back after LLM error: {e}");
            Ok(Json(Generated::fallback(
                fallback_insight(metrics),
                e.public_message(),
            )))
        }
    }
}

/// POST /api/metric-narratives
pub async fn handle_metric_narratives(
    State(state): State<AppState>,
    body: Result<Json<NarrativeRequest>, JsonRejection>,
) -> Result<Json<Generated<NarrativeSet>>, AppError> {
    let Json(req) = body.map_err(|e| {
        AppError::Validation(format!("Invalid metric narrative payload: {}", e.body_text()))
    })?;
    if !(1..=MAX_NARRATIVE_METRICS).contains(&req.metrics.len()) {
        return Err(AppError::Validation(format!(
            "Invalid metric narrative payload: expected 1-{MAX_NARRATIVE_METRICS} metrics, got {}",
            req.metrics.len()
        )));
    }

    let req_id = request_id();
    info!(
        "[metric-narratives:{req_id}] start model={} metrics={}",
        state.llm.model(),
        req.metrics.len()
    );

    let context = json!({
        "metrics": req.metrics,
        "filters": req.filters,
        "insightContext": req.insight_context,
    });

    let result = state
        .llm
        .chat_json::<NarrativeSet>(
            &prompts::narratives_system(),
            &prompts::narratives_prompt(&context),
            prompts::NARRATIVES_TEMPERATURE,
        )
        .await
        .and_then(|set| validated(set, NarrativeSet::validate));

    match result {
        Ok(set) => Ok(Json(Generated::llm(set, state.llm.model()))),
        Err(e) => {
            warn!("[metric-narratives:{req_id}] falling back after LLM error: {e}");
            let items = req.metrics.iter().map(fallback_narrative).collect();
            Ok(Json(Generated::fallback(
                NarrativeSet { items },
                e.public_message(),
            )))
        }
    }
}

/// Turns a schema violation in model output into an `LlmError` so it takes the fallback path.
fn validated<T>(value: T, check: fn(&T) -> Result<(), String>) -> Result<T, LlmError> {
    check(&value).map_err(LlmError::InvalidOutput)?;
    Ok(value)
}
