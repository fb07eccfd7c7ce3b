use serde::Serialize;
use thiserror::Error;

/// Errors that end a single chat turn.
///
/// The `Display` output is what the user sees in the conversation thread, so
/// each variant carries the exact prefix shown to them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("OCR failed: {0}")]
    OcrFailure(String),

    #[error("Error connecting to model: {0}")]
    ModelConnection(String),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponseShape(String),
}

/// Discriminant of [`ChatError`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OcrFailure,
    ModelConnection,
    UnexpectedResponseShape,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::OcrFailure(_) => ErrorKind::OcrFailure,
            ChatError::ModelConnection(_) => ErrorKind::ModelConnection,
            ChatError::UnexpectedResponseShape(_) => ErrorKind::UnexpectedResponseShape,
        }
    }
}
