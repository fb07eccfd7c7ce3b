pub mod error;
pub mod message;
pub mod traits;

pub use error::{ChatError, ErrorKind};
pub use message::{ConversationEntry, EntryContent, EntryKind, HistoryEntry, Role};
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
