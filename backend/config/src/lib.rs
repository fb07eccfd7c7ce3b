//! `codelens-config`: runtime configuration for the CodeLens service.
//!
//! Provides:
//! - Typed config schema (gateway, model endpoint, OCR engine, uploads, logging)
//! - YAML loading (a missing or empty file means defaults)
//! - Environment variable overrides
//! - Default values
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, apply_process_env, InvalidEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{
    CodeLensConfig, GatewayConfig, LoggingConfig, ModelConfig, OcrConfig, UploadsConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load a config file, apply env overrides, and validate.
///
/// This is the main entry point for loading a config at runtime. Warnings are
/// logged; any validation error aborts the load.
pub async fn load_and_prepare(path: &Path) -> Result<CodeLensConfig> {
    let config = load_config(path).await?;
    let config = apply_process_env(config).context("Failed to apply environment overrides")?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("{} invalid config value(s) in {}", report.errors.len(), path.display());
    }

    Ok(config)
}
