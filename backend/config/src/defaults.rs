//! Default values for every config section.

/// Default HTTP bind address for the web UI.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default HTTP port for the web UI.
pub const DEFAULT_PORT: u16 = 8501;

/// Local Ollama server.
pub const DEFAULT_MODEL_BASE_URL: &str = "http://127.0.0.1:11434";

/// Model requested from the local server.
pub const DEFAULT_MODEL: &str = "qwen:0.5b";

/// Upper bound on a single model call, in seconds.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// OCR engine binary, resolved through `PATH` unless absolute.
pub const DEFAULT_OCR_COMMAND: &str = "tesseract";

pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Legacy + LSTM engines.
pub const DEFAULT_OCR_OEM: u8 = 3;

/// Assume a single uniform block of text.
pub const DEFAULT_OCR_PSM: u8 = 6;

pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;

/// Image types accepted by the upload form.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Largest accepted upload (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";
