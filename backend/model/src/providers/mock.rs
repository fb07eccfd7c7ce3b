use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use codelens_core::{ChatError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns a canned reply or a canned error, and
/// remembers every prompt it was given.
pub struct MockProvider {
    name: String,
    outcome: Result<String, ChatError>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Ok("Mock response".to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.outcome = Ok(response.into());
        self
    }

    pub fn with_error(mut self, error: ChatError) -> Self {
        self.outcome = Err(error);
        self
    }

    /// Number of completed `complete` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(req.prompt.clone());
        }
        let content = self.outcome.clone()?;
        Ok(LlmResponse {
            content,
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}
