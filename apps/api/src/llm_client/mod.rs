/// LLM Client — the single point of entry for all chat-completion calls in Cockpit.
///
/// ARCHITECTURAL RULE: No other module may call OpenRouter directly.
/// All LLM interactions MUST go through this module.
///
/// Speaks the OpenAI-compatible `/chat/completions` protocol that OpenRouter exposes.
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("OPENROUTER_API_KEY is not configured")]
    MissingApiKey,

    #[error("Model output failed validation: {0}")]
    InvalidOutput(String),
}

impl LlmError {
    /// Client-safe description: never echoes upstream bodies or credentials.
    pub fn public_message(&self) -> &'static str {
        let status = match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        };
        let text = self.to_string().to_lowercase();

        if matches!(self, LlmError::MissingApiKey) {
            return "AI is not configured (missing env vars: OPENROUTER_API_KEY).";
        }
        if status == Some(429)
            || matches!(self, LlmError::RateLimited { .. })
            || text.contains("rate limit")
            || text.contains("rate-limit")
        {
            return "Rate limit reached on the AI provider. Please retry shortly.";
        }
        if matches!(self, LlmError::Http(e) if e.is_timeout())
            || text.contains("timed out")
            || text.contains("aborted")
        {
            return "The AI request timed out. Please retry.";
        }
        if matches!(status, Some(401) | Some(403)) {
            return "AI provider authentication failed. Check OPENROUTER_API_KEY.";
        }
        if text.contains("data policy") {
            return "The configured model is blocked by the account's privacy/data policy settings.";
        }
        "An error occurred."
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single chat client used by all AI endpoints.
/// Wraps OpenRouter's chat completions API with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    site_url: String,
    app_name: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.openrouter_timeout_secs))
                .build()?,
            api_key: config.openrouter_api_key.clone(),
            base_url: config.openrouter_base_url.trim_end_matches('/').to_string(),
            site_url: config.openrouter_site_url.clone(),
            app_name: config.openrouter_app_name.clone(),
            model: config.primary_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Makes a raw chat call, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and connection errors with exponential backoff.
    /// A timed-out request is returned immediately; retrying a stalled provider only stalls the caller.
    pub async fn call(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .header("HTTP-Referer", &self.site_url)
                .json(&request_body);
            if let Some(name) = &self.app_name {
                request = request.header("X-Title", name);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    warn!("LLM call timed out: {e}");
                    return Err(LlmError::Http(e));
                }
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the model and returns the text of the first choice.
    pub async fn chat(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        let response = self.call(system, user, temperature).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    /// Calls the model and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        temperature: Option<f32>,
    ) -> Result<T, LlmError> {
        let text = self.chat(system, user, temperature).await?;
        serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> LlmClient {
        let mut config = Config::for_tests();
        config.openrouter_base_url = server.uri();
        config.openrouter_api_key = key.map(str::to_string);
        config.openrouter_app_name = Some("Cockpit".to_string());
        LlmClient::from_config(&config).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5}
        })
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_public_message_rate_limit() {
        let err = LlmError::Api {
            status: 429,
            message: "Too many requests".into(),
        };
        assert!(err.public_message().contains("Rate limit"));

        let err = LlmError::Api {
            status: 500,
            message: "rate-limited by provider".into(),
        };
        assert!(err.public_message().contains("Rate limit"));
    }

    #[test]
    fn test_public_message_auth() {
        for status in [401, 403] {
            let err = LlmError::Api {
                status,
                message: "Invalid key".into(),
            };
            assert!(err.public_message().contains("authentication failed"));
        }
    }

    #[test]
    fn test_public_message_timeout_and_policy() {
        let err = LlmError::Api {
            status: 504,
            message: "Connection timed out after 45s".into(),
        };
        assert!(err.public_message().contains("timed out"));

        let err = LlmError::Api {
            status: 404,
            message: "No endpoints found matching your data policy".into(),
        };
        assert!(err.public_message().contains("privacy/data policy"));
    }

    #[test]
    fn test_public_message_missing_key_and_generic() {
        assert!(LlmError::MissingApiKey
            .public_message()
            .contains("missing env vars"));
        assert_eq!(LlmError::EmptyContent.public_message(), "An error occurred.");
    }

    #[tokio::test]
    async fn test_chat_sends_openrouter_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("x-title", "Cockpit"))
            .and(body_partial_json(json!({
                "model": crate::config::DEFAULT_MODEL,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let text = client.chat("sys", "hello", None).await.unwrap();
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_chat_json_strips_fences() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("```json\n{\"n\": 3}\n```")),
            )
            .mount(&server)
            .await;

        #[derive(Deserialize)]
        struct N {
            n: u32,
        }

        let client = client_for(&server, Some("sk-test"));
        let parsed: N = client.chat_json("sys", "user", Some(0.1)).await.unwrap();
        assert_eq!(parsed.n, 3);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("x")))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.chat("sys", "user", None).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_client_error_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"error": {"message": "No auth credentials found"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("bad"));
        match client.chat("sys", "user", None).await.unwrap_err() {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "No auth credentials found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let err = client.chat("sys", "user", None).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(MAX_RETRIES as u64)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let err = client.chat("sys", "user", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 429, .. }));
        assert!(err.public_message().contains("Rate limit"));
    }

    #[tokio::test]
    async fn test_timeout_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::for_tests();
        config.openrouter_base_url = server.uri();
        config.openrouter_api_key = Some("sk-test".to_string());
        config.openrouter_timeout_secs = 1;
        let client = LlmClient::from_config(&config).unwrap();

        let err = client.chat("sys", "user", None).await.unwrap_err();
        assert!(matches!(&err, LlmError::Http(e) if e.is_timeout()));
        assert!(err.public_message().contains("timed out"));
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(MAX_RETRIES as u64)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let err = client.chat("sys", "user", None).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }
}
