//! Moka-based in-process cache provider
//!
//! Wraps a bounded, least-recently-used async map. Suitable as the
//! first link of a provider chain: hits never leave the process.
//!
//! ## Behavior
//! - Requires at least one of a size bound or a time bound
//! - Size pressure evicts least-recently-used entries; Moka's internal
//!   housekeeping purges expired entries continuously
//! - Stale entries that housekeeping has not removed yet are treated as
//!   misses by the shared entry liveness check, never returned
//! - Sector eviction registers an invalidation predicate over the
//!   provider's whole key space

use super::MEMORY_PROVIDER_KIND;
use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache as MokaCache;
use std::collections::HashMap;
use tavern_domain::error::{Error, Result};
use tavern_domain::ports::{CacheProvider, CacheValue};
use tavern_domain::value_objects::{CacheEntry, CacheProps, CacheSector};

/// In-process bounded LRU cache provider
pub struct MemoryCacheProvider<T: CacheValue> {
    cache: MokaCache<String, CacheEntry<T>>,
    props: CacheProps,
}

impl<T: CacheValue> MemoryCacheProvider<T> {
    /// Create a provider from cache props.
    ///
    /// Fails with a configuration error unless at least one of
    /// `max_size` / `time_to_live` is set; an unbounded in-process map
    /// would grow without limit.
    pub fn new(props: CacheProps) -> Result<Self> {
        if props.time_to_live.is_none() && props.max_size.is_none() {
            return Err(Error::config(
                "in-process cache requires a time-to-live, a max size, or both",
            ));
        }

        let mut builder = MokaCache::builder().support_invalidation_closures();
        if let Some(max_size) = props.max_size {
            builder = builder.max_capacity(max_size);
        }
        if let Some(time_to_live) = props.time_to_live {
            builder = builder.time_to_live(time_to_live);
        }

        Ok(Self {
            cache: builder.build(),
            props,
        })
    }

    /// Force pending housekeeping; test-only hook for deterministic
    /// entry counts
    #[cfg(test)]
    pub(crate) async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl<T: CacheValue> CacheProvider<T> for MemoryCacheProvider<T> {
    fn kind(&self) -> &str {
        MEMORY_PROVIDER_KIND
    }

    async fn fetch_values(&self, keys: &[String]) -> Result<HashMap<String, CacheEntry<T>>> {
        let now = Utc::now();
        let mut found = HashMap::new();
        for key in keys {
            if let Some(entry) = self.cache.get(key).await {
                // Stale entries housekeeping has not purged yet are
                // misses; they are not deleted here
                if entry.is_alive(now) {
                    found.insert(key.clone(), entry);
                }
            }
        }
        Ok(found)
    }

    async fn write_values(&self, entries: Vec<(String, Option<T>)>) -> Result<()> {
        let now = Utc::now();
        for (key, value) in entries {
            match value {
                Some(value) => {
                    let entry = CacheEntry::new(value).with_props(&self.props, now);
                    self.cache.insert(key, entry).await;
                }
                None => self.cache.invalidate(&key).await,
            }
        }
        Ok(())
    }

    async fn evict_all(&self, sector: &CacheSector) -> Result<()> {
        let sector = sector.clone();
        self.cache
            .invalidate_entries_if(move |key, _| sector.matches(key))
            .map_err(|e| Error::cache(format!("failed to register sector eviction: {e}")))?;
        Ok(())
    }

    async fn entry_count(&self) -> Result<Option<u64>> {
        self.cache.run_pending_tasks().await;
        Ok(Some(self.cache.entry_count()))
    }
}
