//! Environment variable overrides for config values.
//!
//! Each supported variable replaces exactly one field after the file is loaded.

use anyhow::Result;
use std::collections::HashMap;

use crate::schema::CodeLensConfig;

/// Error returned when an override variable holds an unparsable value.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value {value:?} in env var \"{var_name}\": {reason}")]
pub struct InvalidEnvVarError {
    pub var_name: String,
    pub value: String,
    pub reason: String,
}

/// Apply overrides from the current process environment.
pub fn apply_process_env(config: CodeLensConfig) -> Result<CodeLensConfig> {
    apply_env_overrides(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
///
/// Empty values are ignored so `VAR=` does not blank out a setting.
pub fn apply_env_overrides(
    mut config: CodeLensConfig,
    env: &HashMap<String, String>,
) -> Result<CodeLensConfig> {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(bind) = get("CODELENS_BIND") {
        config.gateway.bind = bind;
    }
    if let Some(port) = get("CODELENS_PORT") {
        config.gateway.port = parse_number("CODELENS_PORT", &port)?;
    }
    if let Some(url) = get("OLLAMA_URL") {
        config.model.base_url = url;
    }
    if let Some(model) = get("CODELENS_MODEL") {
        config.model.model = model;
    }
    if let Some(timeout) = get("CODELENS_MODEL_TIMEOUT_SECS") {
        config.model.timeout_secs = parse_number("CODELENS_MODEL_TIMEOUT_SECS", &timeout)?;
    }
    if let Some(cmd) = get("TESSERACT_CMD") {
        config.ocr.command = cmd;
    }
    if let Some(level) = get("CODELENS_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(dir) = get("CODELENS_LOG_DIR") {
        config.logging.dir = Some(dir);
    }

    Ok(config)
}

fn parse_number<T>(var_name: &str, value: &str) -> Result<T, InvalidEnvVarError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| InvalidEnvVarError {
        var_name: var_name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
