//! Configuration types
//!
//! Every section has serde defaults so a missing file or a partial one
//! still yields a runnable configuration. Cache definitions carry their
//! tagged overrides; the effective settings per cache are computed at
//! bootstrap by the configuration resolver against the active context
//! tags.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tavern_domain::resolver::TaggedOverride;
use tavern_domain::value_objects::CacheProps;

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Admin HTTP server binding
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Redis connection shared by remote cache providers
    pub redis: RedisConfig,
    /// Active runtime tag context
    pub context: ContextConfig,
    /// Named cache definitions
    pub caches: Vec<CacheDefinition>,
}

/// Admin HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7420,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON-formatted log lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Connection URL
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

/// Active runtime tag context, as `kind:value` strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Tags describing this process (environment, tenant, ...)
    pub tags: Vec<String>,
}

/// One named cache and its tagged configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDefinition {
    /// Unique cache name within the registry
    pub name: String,
    /// Base settings before any override applies
    #[serde(default)]
    pub settings: CacheSettings,
    /// Tagged partial settings, resolved against the context tags
    #[serde(default)]
    pub overrides: Vec<TaggedOverride>,
}

/// Effective settings for one cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Provider chain in read-precedence order
    pub providers: Vec<String>,
    /// Entry time-to-live in milliseconds
    pub time_to_live_ms: Option<u64>,
    /// Size bound for in-process providers
    pub max_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            providers: vec!["memory".to_string()],
            time_to_live_ms: Some(300_000),
            max_size: Some(10_000),
        }
    }
}

impl CacheSettings {
    /// Provider props derived from these settings
    pub fn props(&self) -> CacheProps {
        CacheProps::new(
            self.time_to_live_ms.map(Duration::from_millis),
            self.max_size,
        )
    }
}
