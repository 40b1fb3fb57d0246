//! Structured logging with tracing
//!
//! Centralized subscriber setup for the platform binaries. The
//! `TAVERN_LOG` environment variable overrides the configured level
//! with a full `EnvFilter` directive.

use crate::config::LoggingConfig;
use tavern_domain::error::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from configuration.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env("TAVERN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    result.map_err(|e| Error::config(format!("failed to initialize logging: {e}")))?;
    tracing::info!(level = %config.level, "logging initialized");
    Ok(())
}
