//! CodeLens chat agent
//!
//! Session state for one UI session and the turn logic that moves a question
//! or a screenshot through OCR and the language model into that session.

pub mod session_state;
pub mod turn;

pub use session_state::ChatSession;
pub use turn::{ChatAgent, EXPLAIN_PROMPT_PREFIX, EXTRACTED_PREFIX, Submission, TurnOutcome};
