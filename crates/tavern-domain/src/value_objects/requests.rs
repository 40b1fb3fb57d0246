//! Bulk operation boundary DTOs
//!
//! Requests address caches by glob pattern rather than by enumerated
//! name; a pattern matching zero caches is a valid no-op.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bulk write across every cache matching the target patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheWriteRequest {
    /// Glob patterns selecting target caches by name
    pub caches: Vec<String>,
    /// Namespace applied to every key in `values`
    pub namespace: String,
    /// Logical key/value pairs to write
    pub values: Vec<(String, Value)>,
}

/// Bulk eviction across every cache matching the target patterns.
///
/// Eviction is addressed either by keyspace sectors, or by explicit keys
/// under a namespace; both may be present in one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheEvictRequest {
    /// Glob patterns selecting target caches by name
    pub caches: Vec<String>,
    /// Glob patterns over physical keys to evict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    /// Namespace for `keys`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Logical keys to delete under `namespace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

/// Summary of one registered cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDescriptor {
    /// The cache name
    pub name: String,
}

/// Introspection detail for one provider in a cache's chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDetails {
    /// Registered provider-type string
    pub kind: String,
    /// Number of entries the provider currently holds, when it can be
    /// counted cheaply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_count: Option<u64>,
}

/// Introspection detail for one registered cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDetails {
    /// The cache name
    pub name: String,
    /// Effective time-to-live in milliseconds, if bounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live_ms: Option<u64>,
    /// Effective size bound, if bounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Provider chain in read-precedence order
    pub providers: Vec<ProviderDetails>,
}
