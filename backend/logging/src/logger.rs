//! Structured Logger
//!
//! Wraps `tracing` with a console layer, an optional rolling JSON file layer,
//! and environment-based level control.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logger settings, usually taken from the `logging` config section.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Write `codelens.log.YYYY-MM-DD` NDJSON files here when set.
    pub dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// Initialize the global logger. Safe to call more than once; later calls are no-ops.
///
/// Fails when the log directory cannot be created or opened.
pub fn init_logger(options: &LogOptions) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = match &options.dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("codelens.log")
                .build(dir)
                .with_context(|| format!("Failed to open log directory: {}", dir.display()))?;
            Some(fmt::layer().json().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
