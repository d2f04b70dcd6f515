//! Logging setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{ExporterError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ExporterError::config(format!("Invalid log level: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    installed.map_err(|e| ExporterError::internal(format!("Failed to install logger: {}", e)))
}
