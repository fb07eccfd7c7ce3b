//! CodeLens configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section and field is
//! optional in the file; missing values fall back to [`crate::defaults`].

use serde::{Deserialize, Serialize};

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for CodeLens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeLensConfig {
    /// Web UI / HTTP server
    pub gateway: GatewayConfig,

    /// Language-model endpoint
    pub model: ModelConfig,

    /// OCR engine invocation
    pub ocr: OcrConfig,

    /// Upload restrictions
    pub uploads: UploadsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl GatewayConfig {
    /// `bind:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Base URL of the Ollama server; `/api/chat` is appended.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// OCR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OcrConfig {
    /// Path or name of the tesseract binary.
    pub command: String,
    pub language: String,
    /// OCR engine mode (`--oem`).
    pub oem: u8,
    /// Page segmentation mode (`--psm`).
    pub psm: u8,
    pub preserve_interword_spaces: bool,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_OCR_COMMAND.to_string(),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            oem: DEFAULT_OCR_OEM,
            psm: DEFAULT_OCR_PSM,
            preserve_interword_spaces: true,
            timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadsConfig {
    /// Lowercase file extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for daily-rotated JSON logs. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "gateway:\n  port: 9000\nmodel:\n  model: llama3\n";
        let cfg: CodeLensConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.port, 9000);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert_eq!(cfg.model.model, "llama3");
        assert_eq!(cfg.model.base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(cfg.model.timeout_secs, 60);
        assert_eq!(cfg.ocr.psm, 6);
    }

    #[test]
    fn camel_case_keys() {
        let yaml = "ocr:\n  preserveInterwordSpaces: false\nuploads:\n  maxBytes: 1024\n";
        let cfg: CodeLensConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!cfg.ocr.preserve_interword_spaces);
        assert_eq!(cfg.uploads.max_bytes, 1024);
        assert_eq!(cfg.uploads.allowed_extensions, vec!["png", "jpg", "jpeg", "bmp"]);
    }

    #[test]
    fn gateway_addr_joins_bind_and_port() {
        assert_eq!(GatewayConfig::default().addr(), "127.0.0.1:8501");
    }
}
