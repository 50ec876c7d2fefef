use std::sync::Arc;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded and augmented once at startup; never mutated afterwards.
    pub dataset: Arc<Dataset>,
    pub llm: LlmClient,
    pub config: Config,
}
