use anyhow::{Context, Result};

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_SITE_URL: &str = "https://ta-dashboard.cockpit";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: String,
    pub dataset_fallback_path: String,
    pub dataset_seed: u64,
    /// Optional: AI endpoints degrade to their fallback responses without it.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_site_url: String,
    pub openrouter_app_name: Option<String>,
    pub primary_model: String,
    /// Per-request timeout for chat calls. Timeouts are not retried.
    pub openrouter_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let env_or = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            dataset_path: env_or("DATASET_PATH", "data/cockpit.csv"),
            dataset_fallback_path: env_or("DATASET_FALLBACK_PATH", "data/airline_ta_master.csv"),
            dataset_seed: env_or("DATASET_SEED", "42")
                .parse::<u64>()
                .context("DATASET_SEED must be an unsigned integer")?,
            openrouter_api_key: optional("OPENROUTER_API_KEY"),
            openrouter_base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
            openrouter_site_url: env_or("OPENROUTER_SITE_URL", DEFAULT_SITE_URL),
            openrouter_app_name: optional("OPENROUTER_APP_NAME"),
            primary_model: env_or("PRIMARY_MODEL", DEFAULT_MODEL),
            openrouter_timeout_secs: env_or("OPENROUTER_TIMEOUT_SECS", "60")
                .parse::<u64>()
                .context("OPENROUTER_TIMEOUT_SECS must be an unsigned integer")?,
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for handler and router tests.
    pub fn for_tests() -> Self {
        Config {
            dataset_path: "unused.csv".to_string(),
            dataset_fallback_path: "unused-fallback.csv".to_string(),
            dataset_seed: 42,
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_site_url: DEFAULT_SITE_URL.to_string(),
            openrouter_app_name: None,
            primary_model: DEFAULT_MODEL.to_string(),
            openrouter_timeout_secs: 60,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}
