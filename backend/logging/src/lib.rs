//! Structured logging for CodeLens.
//!
//! Console output, optional daily-rotated JSON files, and a typed log of chat
//! turn events.

pub mod event_logger;
pub mod logger;

pub use event_logger::{EventLogEntry, EventLogger, TurnEvent};
pub use logger::{init_logger, LogOptions};
