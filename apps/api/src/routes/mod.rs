pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::insights::handlers as insights;
use crate::metrics::handlers as metrics;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::api_health_handler))
        // Dashboard data
        .route("/api/filters", get(metrics::handle_filters))
        .route("/api/metrics", get(metrics::handle_metrics))
        // AI
        .route("/api/ai-insight", get(insights::handle_ai_insight))
        .route("/api/insights", post(insights::handle_insights))
        .route(
            "/api/metric-narratives",
            post(insights::handle_metric_narratives),
        )
        .with_state(state)
}

/// Request tracing and permissive CORS, applied outside the routes.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
