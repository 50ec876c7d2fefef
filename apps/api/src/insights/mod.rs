// AI insight endpoints.
// Free-text insight proxy plus structured cluster insights and metric narratives.
// All model calls go through llm_client; every structured endpoint has a deterministic fallback.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
