//! Cache provider implementations
//!
//! Two media back a cache: a bounded in-process LRU for hot reads and a
//! Redis-backed store for state shared across nodes. Both implement the
//! domain [`CacheProvider`](tavern_domain::ports::CacheProvider) port
//! and are created through the factory registry by their kind string.

pub mod memory;
pub mod redis;

pub use memory::MemoryCacheProvider;
pub use redis::RedisCacheProvider;

/// Kind string the in-process provider registers under
pub const MEMORY_PROVIDER_KIND: &str = "memory";

/// Kind string the Redis provider registers under
pub const REDIS_PROVIDER_KIND: &str = "redis";
