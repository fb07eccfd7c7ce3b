use async_trait::async_trait;

use crate::error::ChatError;

/// Trait for language-model backends that answer a single user prompt.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "ollama", "mock").
    fn name(&self) -> &str;

    /// Send one prompt and return the model's reply text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, ChatError>;
}

/// Request to an LLM provider. Always a single user-role message.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub latency_ms: u64,
}
