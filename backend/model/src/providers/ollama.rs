use std::time::{Duration, Instant};

use async_trait::async_trait;
use codelens_config::ModelConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use codelens_core::{ChatError, LlmProvider, LlmRequest, LlmResponse};

/// Reply used when the server sends a `message` without `content`.
pub const EMPTY_REPLY: &str = "Empty reply from model";

/// Ollama local LLM provider (non-streaming `/api/chat`).
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self::from_config(&ModelConfig::default())
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [OllamaChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct OllamaChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Accepted reply shapes, tried in declaration order.
#[derive(Deserialize)]
#[serde(untagged)]
enum OllamaReply {
    /// `/api/chat`: `{"message": {"role": "assistant", "content": "..."}}`.
    /// Any `message` value selects this shape, even a malformed one.
    Chat { message: serde_json::Value },
    /// `/api/generate`: `{"response": "..."}`
    Generate { response: String },
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Decode a reply body.
///
/// A present `message` wins over `response`, and must be an object whose
/// `content` is a string or absent. A body that is valid JSON but matches
/// neither shape is reported verbatim; a body that is not JSON at all is a
/// connection-level failure.
pub fn decode_reply(body: &str) -> Result<String, ChatError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ChatError::ModelConnection(format!("invalid JSON in reply: {e}")))?;
    let unexpected = || ChatError::UnexpectedResponseShape(body.trim().to_string());

    match serde_json::from_value::<OllamaReply>(value) {
        Ok(OllamaReply::Chat { message }) => serde_json::from_value::<ReplyMessage>(message)
            .map(|m| m.content.unwrap_or_else(|| EMPTY_REPLY.to_string()))
            .map_err(|_| unexpected()),
        Ok(OllamaReply::Generate { response }) => Ok(response),
        Err(_) => Err(unexpected()),
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ChatError> {
        let start = Instant::now();

        let body = OllamaChatRequest {
            model: &self.model,
            messages: [OllamaChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            stream: false,
        };

        debug!(model = %self.model, endpoint = %self.endpoint(), "Sending request to Ollama");

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::ModelConnection(e.to_string()))?;

        // Error statuses still carry a JSON body (e.g. `{"error": "model not found"}`),
        // which is surfaced through the unexpected-shape path.
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::ModelConnection(e.to_string()))?;
        if !status.is_success() {
            warn!(%status, "Ollama returned a non-success status");
        }

        let content = decode_reply(&text)?;

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
