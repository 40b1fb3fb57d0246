//! Application configuration
//!
//! Serde-typed configuration with defaults, loaded from an optional
//! TOML file layered under prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CacheDefinition, CacheSettings, ContextConfig, LoggingConfig, RedisConfig,
    ServerConfig,
};
