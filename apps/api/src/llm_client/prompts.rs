// Shared prompt fragments. Endpoint-specific prompts live in insights/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model anchored to the numbers the dashboard actually computed.
pub const GROUNDING_INSTRUCTION: &str = "\
    - Use only numbers present in the provided metric data; do not invent values.\n\
    - If a value is missing, N/A or --, say it is unavailable.\n\
    - Do not mention system internals, APIs, servers, or databases.";
