//! Screenshot understanding: turn an uploaded code screenshot into text.
//!
//! decode → binarize → OCR → strip editor chrome.

pub mod clean;
pub mod ocr;
pub mod preprocess;

pub use clean::{CHROME_MARKERS, CleanedText, clean_code_output};
pub use ocr::{OcrEngine, TesseractEngine};
pub use preprocess::{BINARY_THRESHOLD, binarize, decode_image, encode_png};

use codelens_core::ChatError;
use tracing::debug;

/// Shown in place of an empty recognition result.
pub const NO_TEXT_DETECTED: &str = "no text detected";

/// Result of running OCR over one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    /// Recognition produced text. `text` is the cleaned output, or the raw
    /// output when cleaning left nothing.
    Text {
        text: String,
        raw_chars: usize,
        kept_lines: usize,
        fell_back_to_raw: bool,
    },
    /// Recognition produced only whitespace.
    NoText,
}

impl OcrOutcome {
    /// Text as shown to the user, with the sentinel for empty recognition.
    pub fn display_text(&self) -> &str {
        match self {
            OcrOutcome::Text { text, .. } => text,
            OcrOutcome::NoText => NO_TEXT_DETECTED,
        }
    }

    /// Text worth sending to the model, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            OcrOutcome::Text { text, .. } => Some(text),
            OcrOutcome::NoText => None,
        }
    }
}

/// Run the full OCR pipeline over uploaded image bytes.
pub async fn run_ocr(engine: &dyn OcrEngine, image_bytes: &[u8]) -> Result<OcrOutcome, ChatError> {
    let image = decode_image(image_bytes)?;
    let binary = binarize(&image);
    let raw = engine.recognize(&binary).await?;

    if raw.trim().is_empty() {
        debug!("OCR produced only whitespace");
        return Ok(OcrOutcome::NoText);
    }

    let cleaned = clean_code_output(&raw);
    let raw_chars = raw.chars().count();
    if cleaned.text.trim().is_empty() {
        debug!(raw_chars, "Cleaning removed every line; keeping raw OCR text");
        return Ok(OcrOutcome::Text {
            text: raw,
            raw_chars,
            kept_lines: 0,
            fell_back_to_raw: true,
        });
    }

    Ok(OcrOutcome::Text {
        text: cleaned.text,
        raw_chars,
        kept_lines: cleaned.kept_lines,
        fell_back_to_raw: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    struct FixedEngine(Result<String, ChatError>);

    #[async_trait]
    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, _image: &GrayImage) -> Result<String, ChatError> {
            self.0.clone()
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = GrayImage::from_pixel(4, 4, Luma([30u8]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[tokio::test]
    async fn whitespace_recognition_is_no_text() {
        let engine = FixedEngine(Ok("  \n\t\n".into()));
        let outcome = run_ocr(&engine, &png_bytes()).await.unwrap();
        assert_eq!(outcome, OcrOutcome::NoText);
        assert_eq!(outcome.display_text(), "no text detected");
        assert!(outcome.text().is_none());
    }

    #[tokio::test]
    async fn chrome_is_stripped() {
        let raw = "File Edit Selection View\ndef add(a, b):\n\n    return a + b\nPROBLEMS OUTPUT\n";
        let engine = FixedEngine(Ok(raw.into()));
        let outcome = run_ocr(&engine, &png_bytes()).await.unwrap();
        assert_eq!(outcome.text(), Some("def add(a, b):\n    return a + b"));
        match outcome {
            OcrOutcome::Text { kept_lines, fell_back_to_raw, .. } => {
                assert_eq!(kept_lines, 2);
                assert!(!fell_back_to_raw);
            }
            OcrOutcome::NoText => panic!("expected text"),
        }
    }

    #[tokio::test]
    async fn chrome_only_output_falls_back_to_raw() {
        let raw = "File Edit View\nTERMINAL PORTS\n";
        let engine = FixedEngine(Ok(raw.into()));
        let outcome = run_ocr(&engine, &png_bytes()).await.unwrap();
        assert_eq!(outcome.display_text(), raw);
        assert!(matches!(outcome, OcrOutcome::Text { fell_back_to_raw: true, .. }));
    }

    #[tokio::test]
    async fn engine_failure_propagates_as_ocr_failure() {
        let engine = FixedEngine(Err(ChatError::OcrFailure("engine crashed".into())));
        let err = run_ocr(&engine, &png_bytes()).await.unwrap_err();
        assert_eq!(err.to_string(), "OCR failed: engine crashed");
    }

    #[tokio::test]
    async fn undecodable_upload_is_ocr_failure() {
        let engine = FixedEngine(Ok("never reached".into()));
        let err = run_ocr(&engine, b"definitely not an image").await.unwrap_err();
        assert!(matches!(err, ChatError::OcrFailure(_)));
    }
}
