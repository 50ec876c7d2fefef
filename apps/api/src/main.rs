mod config;
mod dataset;
mod errors;
mod insights;
mod llm_client;
mod metrics;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dataset::{augment, load_dataset, Dataset};
use crate::llm_client::LlmClient;
use crate::metrics::filters::FILTER_COLUMNS;
use crate::routes::{build_router, with_middleware};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cockpit API v{}", env!("CARGO_PKG_VERSION"));

    // Load the dataset once; a broken file leaves the service up with no data
    let mut dataset = match load_dataset(&config.dataset_path, &config.dataset_fallback_path) {
        Ok(ds) => ds,
        Err(e) => {
            error!("Critical error loading data: {e}");
            Dataset::default()
        }
    };
    augment(&mut dataset, config.dataset_seed);
    info!(
        "Dataset ready: {} records, {} columns (seed {})",
        dataset.len(),
        dataset.headers.len(),
        config.dataset_seed
    );
    if !dataset.is_empty() {
        let missing: Vec<&str> = FILTER_COLUMNS
            .iter()
            .copied()
            .filter(|c| !dataset.has_column(c))
            .collect();
        if !missing.is_empty() {
            warn!("Dataset has no {:?} column(s); those filters are disabled", missing);
        }
    }

    let llm = LlmClient::from_config(&config)?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        info!("OPENROUTER_API_KEY not set; AI endpoints will serve fallback responses");
    }

    let state = AppState {
        dataset: Arc::new(dataset),
        llm,
        config: config.clone(),
    };

    let app = with_middleware(build_router(state));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
