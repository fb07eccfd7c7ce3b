//! Chat turn event logger.
//!
//! Each stage of a turn is emitted as one structured `tracing` event so the
//! JSON file layer produces one NDJSON line per stage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    Submitted {
        kind: String,
        size: usize,
    },
    OcrCompleted {
        raw_chars: usize,
        kept_lines: usize,
        fell_back_to_raw: bool,
    },
    NoTextDetected,
    ModelReplied {
        model: String,
        latency_ms: u64,
        reply_chars: usize,
    },
    Failed {
        kind: String,
        message: String,
    },
    HistoryCleared,
    SessionReset,
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: TurnEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Serialize the event and hand it to the tracing system.
    pub fn log_event(session_id: &str, event: TurnEvent) {
        let failed = matches!(event, TurnEvent::Failed { .. });
        let entry = EventLogEntry {
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) if failed => warn!(target: "codelens::turn", event = %json, "turn failed"),
            Ok(json) => info!(target: "codelens::turn", event = %json, "turn event"),
            Err(e) => warn!("Failed to serialize turn event: {}", e),
        }
    }
}
