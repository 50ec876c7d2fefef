// Prompt text for the AI insight endpoints.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::Value;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};

pub const AI_INSIGHT_SYSTEM: &str = "You are a Talent Acquisition AI Consultant. \
    Analyze the provided metrics and query to give brief, professional insights for airline recruitment. \
    Use terminology 'Internal candidates (Employees)'.";

pub const AI_INSIGHT_TEMPERATURE: Option<f32> = None;
pub const INSIGHTS_TEMPERATURE: Option<f32> = Some(0.15);
pub const NARRATIVES_TEMPERATURE: Option<f32> = Some(0.2);

pub fn ai_insight_user_message(query: &str, current_metrics: &str) -> String {
    format!("User Query: {query}\n\nCurrent Metric Context: {current_metrics}")
}

pub fn insights_system() -> String {
    format!("You are a senior TA analytics advisor. {JSON_ONLY_SYSTEM}")
}

/// `context` is the serialized request: cluster, filters, metric snapshot and extra context.
pub fn insights_prompt(context: &Value) -> String {
    format!(
        "Return concise, executive-ready insights grounded only in provided data.\n\
         Return a JSON object with this EXACT schema:\n\
         {{\"headline\": string (max 160 chars), \
         \"bullets\": [2-4 strings, max 260 chars each], \
         \"action\": string (max 220 chars), \
         \"watchouts\": [0-3 strings, max 200 chars each]}}\n\
         Rules:\n\
         - Prioritize red metrics first, then amber.\n\
         - Mention concrete business implications and keep language specific.\n\
         {GROUNDING_INSTRUCTION}\n\
         \n\
         Context JSON:\n{context}"
    )
}

pub fn narratives_system() -> String {
    format!("You are a senior TA analytics advisor writing metric-level narratives. {JSON_ONLY_SYSTEM}")
}

pub fn narratives_prompt(context: &Value) -> String {
    format!(
        "Return a JSON object with an \"items\" array, one item per metric:\n\
         {{\"items\": [{{\"id\": string, \"alarm\": string (max 180 chars), \
         \"insight\": string (max 320 chars), \"action\": string (max 220 chars)}}]}}\n\
         Rules:\n\
         - Ground statements in supportingFacts; do not invent definitions.\n\
         - Keep each field concise and decision-ready.\n\
         {GROUNDING_INSTRUCTION}\n\
         \n\
         Context JSON:\n{context}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ai_insight_user_message_layout() {
        assert_eq!(
            ai_insight_user_message("why?", "{\"a\":1}"),
            "User Query: why?\n\nCurrent Metric Context: {\"a\":1}"
        );
    }

    #[test]
    fn test_insights_prompt_embeds_context() {
        let prompt = insights_prompt(&json!({"activeCluster": "momentum"}));
        assert!(prompt.contains("\"activeCluster\":\"momentum\""));
        assert!(prompt.contains("Prioritize red metrics first"));
    }
}
