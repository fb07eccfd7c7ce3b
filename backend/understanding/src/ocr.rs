//! Optical Character Recognition (OCR)
//!
//! Bridges a local Tesseract binary. The preprocessed image is piped in as PNG
//! and the recognized text is read back from stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use codelens_config::OcrConfig;
use codelens_core::ChatError;
use image::GrayImage;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::preprocess::encode_png;

/// Something that turns a binary image into raw text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text. Engine failures map to [`ChatError::OcrFailure`].
    async fn recognize(&self, image: &GrayImage) -> Result<String, ChatError>;
}

/// Tesseract CLI adapter.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    language: String,
    oem: u8,
    psm: u8,
    preserve_interword_spaces: bool,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self::from_config(&OcrConfig {
            command: command.into(),
            ..OcrConfig::default()
        })
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            language: config.language.clone(),
            oem: config.oem,
            psm: config.psm,
            preserve_interword_spaces: config.preserve_interword_spaces,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Arguments after the binary name: read stdin, write stdout.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--oem".to_string(),
            self.oem.to_string(),
            "--psm".to_string(),
            self.psm.to_string(),
        ];
        if self.preserve_interword_spaces {
            args.push("-c".to_string());
            args.push("preserve_interword_spaces=1".to_string());
        }
        args
    }

    async fn run(&self, png: Vec<u8>) -> Result<String, ChatError> {
        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ChatError::OcrFailure(format!("cannot start {}: {e}", self.command)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&png)
                .await
                .map_err(|e| ChatError::OcrFailure(format!("cannot write image to engine: {e}")))?;
            // Closing stdin tells tesseract the image is complete.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ChatError::OcrFailure(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChatError::OcrFailure(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &GrayImage) -> Result<String, ChatError> {
        info!(
            width = image.width(),
            height = image.height(),
            command = %self.command,
            "Running OCR"
        );
        let png = encode_png(image)?;

        let text = tokio::time::timeout(self.timeout, self.run(png))
            .await
            .map_err(|_| {
                ChatError::OcrFailure(format!("engine timed out after {}s", self.timeout.as_secs()))
            })??;

        debug!(chars = text.len(), "OCR finished");
        Ok(text)
    }
}
