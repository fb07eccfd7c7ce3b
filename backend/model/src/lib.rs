pub mod providers;

pub use providers::mock::MockProvider;
pub use providers::ollama::{decode_reply, OllamaProvider, EMPTY_REPLY};
