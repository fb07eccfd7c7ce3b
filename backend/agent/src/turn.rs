//! One chat turn: question or screenshot in, bot entries out.

use std::sync::Arc;

use codelens_core::{ChatError, ErrorKind, LlmProvider, LlmRequest};
use codelens_logging::{EventLogger, TurnEvent};
use codelens_understanding::{OcrEngine, OcrOutcome, run_ocr};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::session_state::ChatSession;

/// Header of the bot entry that shows what OCR extracted.
pub const EXTRACTED_PREFIX: &str = "📄 Extracted Code:\n\n";

/// Prepended to extracted code before asking the model about it.
pub const EXPLAIN_PROMPT_PREFIX: &str = "Explain this code in detail:\n\n";

/// What the user sent with one press of "Send".
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub question: String,
    pub image: Option<Vec<u8>>,
}

impl Submission {
    pub fn text(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            image: None,
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        Self {
            question: String::new(),
            image: Some(bytes),
        }
    }
}

/// Summary of what a turn did to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// Conversation entries appended by this turn.
    pub appended: usize,
    pub model_called: bool,
    /// Set when the turn ended in an error; the error text is already in the thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

/// Drives turns against a session using one OCR engine and one model.
#[derive(Clone)]
pub struct ChatAgent {
    llm: Arc<dyn LlmProvider>,
    ocr: Arc<dyn OcrEngine>,
}

impl ChatAgent {
    pub fn new(llm: Arc<dyn LlmProvider>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { llm, ocr }
    }

    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    pub fn ocr_name(&self) -> &str {
        self.ocr.name()
    }

    /// Handle one submit. An image wins over the text field; a submit with
    /// neither does nothing.
    pub async fn submit(&self, session: &mut ChatSession, submission: Submission) -> TurnOutcome {
        match submission.image {
            Some(bytes) => self.handle_image(session, bytes).await,
            None => self.handle_text(session, &submission.question).await,
        }
    }

    /// Ask the model a typed question.
    #[instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn handle_text(&self, session: &mut ChatSession, question: &str) -> TurnOutcome {
        if question.trim().is_empty() {
            return TurnOutcome::default();
        }
        EventLogger::log_event(
            session.id(),
            TurnEvent::Submitted {
                kind: "text".into(),
                size: question.len(),
            },
        );

        session.push_user_text(question);
        let error = self.reply(session, question.to_string()).await;

        TurnOutcome {
            appended: 2,
            model_called: true,
            error,
        }
    }

    /// OCR a screenshot, show what was extracted, then ask the model to explain it.
    #[instrument(skip_all, fields(session_id = %session.id(), bytes = bytes.len()))]
    pub async fn handle_image(&self, session: &mut ChatSession, bytes: Vec<u8>) -> TurnOutcome {
        EventLogger::log_event(
            session.id(),
            TurnEvent::Submitted {
                kind: "image".into(),
                size: bytes.len(),
            },
        );

        let result = run_ocr(self.ocr.as_ref(), &bytes).await;
        session.push_user_image(bytes);

        let extracted = match result {
            Ok(outcome) => {
                log_ocr_outcome(session.id(), &outcome);
                outcome
            }
            Err(err) => {
                warn!(error = %err, "OCR failed");
                log_failure(session.id(), &err);
                session.push_bot_text(format!("{EXTRACTED_PREFIX}{err}"));
                return TurnOutcome {
                    appended: 2,
                    model_called: false,
                    error: Some(err.kind()),
                };
            }
        };

        session.push_bot_text(format!("{EXTRACTED_PREFIX}{}", extracted.display_text()));

        let Some(code) = extracted.text() else {
            info!("No text detected; skipping model call");
            return TurnOutcome {
                appended: 2,
                model_called: false,
                error: None,
            };
        };

        info!("Extracted code is being explained");
        let error = self.reply(session, format!("{EXPLAIN_PROMPT_PREFIX}{code}")).await;
        TurnOutcome {
            appended: 3,
            model_called: true,
            error,
        }
    }

    /// "Clear History": empties the sidebar, leaves the thread.
    pub fn clear_history(&self, session: &mut ChatSession) {
        session.clear_history();
        EventLogger::log_event(session.id(), TurnEvent::HistoryCleared);
    }

    /// Drop everything the session holds.
    pub fn reset(&self, session: &mut ChatSession) {
        session.reset();
        EventLogger::log_event(session.id(), TurnEvent::SessionReset);
    }

    /// Ask the model and append exactly one bot entry with the reply or the error.
    async fn reply(&self, session: &mut ChatSession, prompt: String) -> Option<ErrorKind> {
        match self.llm.complete(&LlmRequest::new(prompt)).await {
            Ok(response) => {
                EventLogger::log_event(
                    session.id(),
                    TurnEvent::ModelReplied {
                        model: response.model.clone(),
                        latency_ms: response.latency_ms,
                        reply_chars: response.content.chars().count(),
                    },
                );
                session.push_bot_text(response.content);
                None
            }
            Err(err) => {
                warn!(provider = self.llm.name(), error = %err, "Model call failed");
                log_failure(session.id(), &err);
                let kind = err.kind();
                session.push_bot_text(err.to_string());
                Some(kind)
            }
        }
    }
}

fn log_ocr_outcome(session_id: &str, outcome: &OcrOutcome) {
    let event = match outcome {
        OcrOutcome::Text {
            raw_chars,
            kept_lines,
            fell_back_to_raw,
            ..
        } => TurnEvent::OcrCompleted {
            raw_chars: *raw_chars,
            kept_lines: *kept_lines,
            fell_back_to_raw: *fell_back_to_raw,
        },
        OcrOutcome::NoText => TurnEvent::NoTextDetected,
    };
    EventLogger::log_event(session_id, event);
}

fn log_failure(session_id: &str, err: &ChatError) {
    EventLogger::log_event(
        session_id,
        TurnEvent::Failed {
            kind: format!("{:?}", err.kind()),
            message: err.to_string(),
        },
    );
}
