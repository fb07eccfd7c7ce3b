//! Uploaded media handling: payload type, MIME detection, and upload policy.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub mod mime_detect;

pub use mime_detect::{detect_mime_type, extension_of, sniff_image_mime};

/// An uploaded file as received from the UI.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl MediaPayload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let mime_type = detect_mime_type(&filename).to_string();
        Self {
            filename,
            mime_type,
            data: data.into(),
        }
    }
}

/// Why an upload was turned away before reaching the OCR pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("file type '{0}' is not allowed")]
    DisallowedType(String),

    #[error("file is empty")]
    Empty,

    #[error("file is {size} bytes, the limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Which uploads the UI accepts.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    max_bytes: usize,
}

impl UploadPolicy {
    pub fn new(allowed_extensions: impl IntoIterator<Item = impl Into<String>>, max_bytes: usize) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.into().to_lowercase())
                .collect(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Value for an HTML `accept` attribute, e.g. `.png,.jpg`.
    pub fn accept_attr(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn check(&self, payload: &MediaPayload) -> Result<(), UploadRejection> {
        let ext = extension_of(&payload.filename);
        if !self.allowed_extensions.iter().any(|allowed| *allowed == ext) {
            warn!(filename = %payload.filename, "Rejected upload with disallowed extension");
            return Err(UploadRejection::DisallowedType(ext));
        }
        if payload.data.is_empty() {
            return Err(UploadRejection::Empty);
        }
        if payload.data.len() > self.max_bytes {
            warn!(size = payload.data.len(), limit = self.max_bytes, "Rejected oversized upload");
            return Err(UploadRejection::TooLarge {
                size: payload.data.len(),
                limit: self.max_bytes,
            });
        }
        debug!(filename = %payload.filename, mime = %payload.mime_type, "Accepted upload");
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(["png", "jpg", "jpeg", "bmp"], 10 * 1024 * 1024)
    }
}
