use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metrics::Rag;

pub const MAX_NARRATIVE_METRICS: usize = 24;

/// One KPI as rendered on the dashboard, sent back by the client as AI context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub id: String,
    pub title: String,
    pub value_text: String,
    pub threshold_text: String,
    pub rag: Rag,
    #[serde(default)]
    pub supporting_facts: Vec<String>,
}

impl MetricSnapshot {
    pub fn is_unavailable(&self) -> bool {
        let v = self.value_text.trim().to_uppercase();
        v == "N/A" || v == "--"
    }
}

/// Query parameters of `GET /api/ai-insight`.
#[derive(Debug, Deserialize)]
pub struct AiInsightQuery {
    pub query: String,
    pub current_metrics: String,
}

#[derive(Debug, Serialize)]
pub struct AiInsightResponse {
    pub insight: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshotSet {
    pub active_cluster: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricSnapshot>,
}

/// Body of `POST /api/insights`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub active_cluster: Option<String>,
    pub filters: Option<Value>,
    pub metric_snapshot: Option<MetricSnapshotSet>,
    pub insight_context: Option<Value>,
}

/// Executive summary for one dashboard cluster, as produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInsight {
    pub headline: String,
    pub bullets: Vec<String>,
    pub action: String,
    #[serde(default)]
    pub watchouts: Vec<String>,
}

impl ClusterInsight {
    /// Enforces the response contract; model output that fails it is discarded.
    pub fn validate(&self) -> Result<(), String> {
        check_text("headline", &self.headline, 160)?;
        if !(2..=4).contains(&self.bullets.len()) {
            return Err(format!("expected 2-4 bullets, got {}", self.bullets.len()));
        }
        for bullet in &self.bullets {
            check_text("bullet", bullet, 260)?;
        }
        check_text("action", &self.action, 220)?;
        if self.watchouts.len() > 3 {
            return Err(format!("expected at most 3 watchouts, got {}", self.watchouts.len()));
        }
        for watchout in &self.watchouts {
            check_text("watchout", watchout, 200)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Llm,
    Fallback,
}

/// Response wrapper shared by the structured AI endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated<T> {
    #[serde(flatten)]
    pub body: T,
    pub generated_at: DateTime<Utc>,
    pub source: InsightSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Generated<T> {
    pub fn llm(body: T, model: &str) -> Self {
        Self {
            body,
            generated_at: Utc::now(),
            source: InsightSource::Llm,
            model: Some(model.to_string()),
            error: None,
        }
    }

    pub fn fallback(body: T, error: &str) -> Self {
        Self {
            body,
            generated_at: Utc::now(),
            source: InsightSource::Fallback,
            model: None,
            error: Some(error.to_string()),
        }
    }
}

/// Body of `POST /api/metric-narratives`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub metrics: Vec<MetricSnapshot>,
    pub filters: Option<Value>,
    pub insight_context: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub id: String,
    pub alarm: String,
    pub insight: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSet {
    pub items: Vec<Narrative>,
}

impl NarrativeSet {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_NARRATIVE_METRICS).contains(&self.items.len()) {
            return Err(format!("expected 1-24 items, got {}", self.items.len()));
        }
        for item in &self.items {
            check_text("alarm", &item.alarm, 180)?;
            check_text("insight", &item.insight, 320)?;
            check_text("action", &item.action, 220)?;
        }
        Ok(())
    }
}

fn check_text(field: &str, value: &str, max_chars: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(format!("{field} is empty"));
    }
    if len > max_chars {
        return Err(format!("{field} exceeds {max_chars} characters"));
    }
    Ok(())
}
