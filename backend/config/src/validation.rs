//! Config validation: field checks with user-friendly error messages.

use crate::schema::CodeLensConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CodeLensConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_gateway(config, &mut report);
    validate_model(config, &mut report);
    validate_ocr(config, &mut report);
    validate_uploads(config, &mut report);
    report
}

fn validate_gateway(config: &CodeLensConfig, report: &mut ValidationReport) {
    let gw = &config.gateway;
    if gw.bind.trim().is_empty() {
        report.error("gateway.bind", "Bind address cannot be empty");
    }
    if gw.port != 0 && gw.port < 1024 && gw.port != 80 && gw.port != 443 {
        report.warn(
            "gateway.port",
            format!("Port {} requires elevated privileges; consider using a port >= 1024", gw.port),
        );
    }
}

fn validate_model(config: &CodeLensConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if !(model.base_url.starts_with("http://") || model.base_url.starts_with("https://")) {
        report.error("model.baseUrl", format!("'{}' is not an http(s) URL", model.base_url));
    }
    if model.model.trim().is_empty() {
        report.error("model.model", "Model identifier cannot be empty");
    }
    if model.timeout_secs == 0 {
        report.error("model.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn validate_ocr(config: &CodeLensConfig, report: &mut ValidationReport) {
    let ocr = &config.ocr;
    if ocr.command.trim().is_empty() {
        report.error("ocr.command", "OCR command cannot be empty");
    }
    if ocr.language.trim().is_empty() {
        report.error("ocr.language", "OCR language cannot be empty");
    }
    if ocr.oem > 3 {
        report.error("ocr.oem", format!("Unknown engine mode {}. Use 0-3", ocr.oem));
    }
    if ocr.psm > 13 {
        report.error("ocr.psm", format!("Unknown page segmentation mode {}. Use 0-13", ocr.psm));
    }
    if ocr.psm != 6 {
        report.warn("ocr.psm", "Modes other than 6 tend to split code blocks into fragments");
    }
    if ocr.timeout_secs == 0 {
        report.error("ocr.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn validate_uploads(config: &CodeLensConfig, report: &mut ValidationReport) {
    let uploads = &config.uploads;
    if uploads.allowed_extensions.is_empty() {
        report.warn("uploads.allowedExtensions", "No extensions allowed; image upload is disabled");
    }
    for (i, ext) in uploads.allowed_extensions.iter().enumerate() {
        if ext.starts_with('.') || ext.chars().any(|c| c.is_ascii_uppercase()) {
            report.error(
                format!("uploads.allowedExtensions[{i}]"),
                format!("'{ext}' must be lowercase without a leading dot"),
            );
        }
    }
    if uploads.max_bytes == 0 {
        report.error("uploads.maxBytes", "maxBytes must be > 0");
    }
}
