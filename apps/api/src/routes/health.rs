use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cockpit-api"
    }))
}

/// GET /api/health
/// Reports AI configuration and dataset size without exposing secrets.
pub async fn api_health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "hasOpenRouterKey": state.llm.has_api_key(),
        "chatModel": state.llm.model(),
        "records": state.dataset.len(),
        "datasetSource": state.dataset.source,
        "datasetSeed": state.config.dataset_seed,
    }))
}
