//! Cache provider port
//!
//! Defines the capability set a storage medium must implement to back a
//! cache: batch fetch, batch write with per-key deletion, and
//! glob-sector eviction. Implementations are selected through a factory
//! registry keyed by their [`CacheProvider::kind`] string, so new
//! providers plug in without touching dispatch code.

use crate::error::Result;
use crate::value_objects::{CacheEntry, CacheSector};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// Marker for values that can live in a cache.
///
/// Blanket-implemented; the bounds are what providers need to clone
/// entries in memory and serialize them for remote stores.
pub trait CacheValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// One storage medium backing a cache
#[async_trait]
pub trait CacheProvider<T: CacheValue>: Send + Sync {
    /// Registered provider-type string (e.g. "memory", "redis")
    fn kind(&self) -> &str;

    /// Fetch entries for the given physical keys.
    ///
    /// Returns only entries that are both present and alive; a stale
    /// entry is a miss and is not deleted by this call.
    async fn fetch_values(&self, keys: &[String]) -> Result<HashMap<String, CacheEntry<T>>>;

    /// Write entries at the given physical keys.
    ///
    /// A `None` value deletes the key; a `Some` value is written with
    /// its expiry re-stamped from the provider's props.
    async fn write_values(&self, entries: Vec<(String, Option<T>)>) -> Result<()>;

    /// Remove all and only the keys whose physical key falls inside the
    /// sector
    async fn evict_all(&self, sector: &CacheSector) -> Result<()>;

    /// Number of entries currently held, when the medium can count them
    /// cheaply
    async fn entry_count(&self) -> Result<Option<u64>>;
}
