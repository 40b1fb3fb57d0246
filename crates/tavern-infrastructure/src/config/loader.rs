//! Configuration loader
//!
//! Layers configuration sources: built-in defaults, then an optional
//! TOML file, then prefixed environment variables.

use crate::config::types::AppConfig;
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tavern_domain::error::{Error, Result};

/// Default environment variable prefix
const CONFIG_ENV_PREFIX: &str = "TAVERN";

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let defaults = toml::to_string(&AppConfig::default())
            .map_err(|e| Error::config_with("failed to serialize default config", e))?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.as_path()));
                tracing::info!(path = %config_path.display(), "loading configuration file");
            } else {
                tracing::warn!(path = %config_path.display(), "configuration file not found");
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| Error::config_with("failed to load configuration", e))
    }
}
