//! Redis-based remote cache provider
//!
//! Backs a cache with a networked key-value store so entries survive the
//! process and are visible to every node. Entries are stored as JSON
//! documents at the physical key and expire through Redis's native
//! millisecond time-bound write.
//!
//! ## Behavior
//! - Construction fails fast on a size bound (the store manages its own
//!   capacity) or a missing time-to-live (the provider performs no local
//!   expiry bookkeeping of its own)
//! - Batch reads use `MGET`; each document is re-checked with the shared
//!   entry liveness predicate, so clock skew or a lazily purging server
//!   yields a miss, never a stale value
//! - Sector eviction walks a cursor `SCAN` per pattern and re-verifies
//!   every candidate against the sector matcher before deleting, keeping
//!   the "all and only matching keys" contract independent of the
//!   server's own pattern dialect
//! - Transport failures propagate unmodified; no retry at this layer

use super::REDIS_PROVIDER_KIND;
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::Client;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Duration;
use tavern_domain::error::{Error, Result};
use tavern_domain::ports::{CacheProvider, CacheValue};
use tavern_domain::value_objects::{CacheEntry, CacheProps, CacheSector};
use tokio::time::timeout;

/// Upper bound on acquiring a multiplexed connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Keys requested from the server per SCAN iteration
const SCAN_COUNT: usize = 512;

/// Remote cache provider backed by Redis
pub struct RedisCacheProvider<T> {
    client: Client,
    props: CacheProps,
    _value: PhantomData<fn() -> T>,
}

impl<T: CacheValue> RedisCacheProvider<T> {
    /// Create a provider for the given connection URL and props.
    ///
    /// Connections are established lazily; only the URL is validated
    /// here, along with the props: a `max_size` is rejected and a
    /// `time_to_live` is required.
    pub fn new(url: &str, props: CacheProps) -> Result<Self> {
        if props.max_size.is_some() {
            return Err(Error::config(
                "remote cache does not take a max size; the backing store manages its own capacity",
            ));
        }
        if props.time_to_live.is_none() {
            return Err(Error::config("remote cache requires a time-to-live"));
        }

        let client = Client::open(url)
            .map_err(|e| Error::config_with(format!("invalid redis url '{url}'"), e))?;
        tracing::info!(url, "initialized redis cache provider");

        Ok(Self {
            client,
            props,
            _value: PhantomData,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            Error::transport("timed out acquiring redis connection; check server availability")
        })?
        .map_err(|e| Error::transport_with("failed to establish redis connection", e))
    }

    fn ttl_millis(&self) -> u64 {
        // Validated Some at construction
        self.props
            .time_to_live
            .map(|ttl| ttl.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[async_trait]
impl<T: CacheValue> CacheProvider<T> for RedisCacheProvider<T> {
    fn kind(&self) -> &str {
        REDIS_PROVIDER_KIND
    }

    async fn fetch_values(&self, keys: &[String]) -> Result<HashMap<String, CacheEntry<T>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.connection().await?;

        let documents: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::transport_with("redis MGET failed", e))?;

        let now = Utc::now();
        let mut found = HashMap::new();
        for (key, document) in keys.iter().zip(documents) {
            let Some(document) = document else { continue };
            match serde_json::from_str::<CacheEntry<T>>(&document) {
                Ok(entry) if entry.is_alive(now) => {
                    found.insert(key.clone(), entry);
                }
                // The store has not purged the key yet; a miss
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding undecodable cache document");
                }
            }
        }
        Ok(found)
    }

    async fn write_values(&self, entries: Vec<(String, Option<T>)>) -> Result<()> {
        let mut conn = self.connection().await?;
        let now = Utc::now();
        let ttl_millis = self.ttl_millis();

        for (key, value) in entries {
            match value {
                Some(value) => {
                    let entry = CacheEntry::new(value).with_props(&self.props, now);
                    let document = serde_json::to_string(&entry)?;
                    redis::cmd("SET")
                        .arg(&key)
                        .arg(document)
                        .arg("PX")
                        .arg(ttl_millis)
                        .query_async::<()>(&mut conn)
                        .await
                        .map_err(|e| {
                            Error::transport_with(format!("redis SET failed for '{key}'"), e)
                        })?;
                }
                None => {
                    redis::cmd("DEL")
                        .arg(&key)
                        .query_async::<()>(&mut conn)
                        .await
                        .map_err(|e| {
                            Error::transport_with(format!("redis DEL failed for '{key}'"), e)
                        })?;
                }
            }
        }
        Ok(())
    }

    async fn evict_all(&self, sector: &CacheSector) -> Result<()> {
        let mut conn = self.connection().await?;

        for pattern in sector.patterns() {
            let mut cursor: u64 = 0;
            loop {
                let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(SCAN_COUNT)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| Error::transport_with("redis SCAN failed", e))?;

                // The server's MATCH narrows the walk; the sector
                // matcher decides membership
                let matched: Vec<String> =
                    batch.into_iter().filter(|key| sector.matches(key)).collect();
                if !matched.is_empty() {
                    redis::cmd("DEL")
                        .arg(&matched)
                        .query_async::<()>(&mut conn)
                        .await
                        .map_err(|e| Error::transport_with("redis DEL failed", e))?;
                }

                cursor = next;
                if cursor == 0 {
                    break;
                }
            }
        }
        Ok(())
    }

    async fn entry_count(&self) -> Result<Option<u64>> {
        // The store manages its own key space; not enumerated here
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_URL: &str = "redis://localhost:6379";

    fn props() -> CacheProps {
        CacheProps::with_time_to_live(Duration::from_secs(60))
    }

    #[test]
    fn test_construction_rejects_max_size() {
        let result = RedisCacheProvider::<serde_json::Value>::new(
            TEST_URL,
            CacheProps::new(Some(Duration::from_secs(60)), Some(100)),
        );
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_construction_requires_time_to_live() {
        let result =
            RedisCacheProvider::<serde_json::Value>::new(TEST_URL, CacheProps::default());
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_construction_rejects_invalid_url() {
        let result = RedisCacheProvider::<serde_json::Value>::new("not-a-url", props());
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    // The remaining tests require a running Redis server:
    // docker run -d -p 6379:6379 redis:latest

    #[tokio::test]
    #[ignore] // requires Redis
    async fn test_write_then_fetch_round_trip() {
        let provider = RedisCacheProvider::<serde_json::Value>::new(TEST_URL, props()).unwrap();
        let key = "tavern-test:ns1:user-42".to_string();

        provider
            .write_values(vec![(key.clone(), Some(serde_json::json!({"id": 42})))])
            .await
            .unwrap();

        let found = provider.fetch_values(&[key.clone()]).await.unwrap();
        assert_eq!(found[&key].value["id"], 42);

        provider.write_values(vec![(key, None)]).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // requires Redis
    async fn test_sector_eviction_targets_exactly_matching_keys() {
        let provider = RedisCacheProvider::<serde_json::Value>::new(TEST_URL, props()).unwrap();
        for key in ["tavern-test:a:1", "tavern-test:a:2", "tavern-test:b:1"] {
            provider
                .write_values(vec![(key.to_string(), Some(serde_json::json!(key)))])
                .await
                .unwrap();
        }

        let sector = CacheSector::new(&["tavern-test:a:*".to_string()]).unwrap();
        provider.evict_all(&sector).await.unwrap();

        let keys: Vec<String> = ["tavern-test:a:1", "tavern-test:a:2", "tavern-test:b:1"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        let found = provider.fetch_values(&keys).await.unwrap();
        assert!(!found.contains_key("tavern-test:a:1"));
        assert!(!found.contains_key("tavern-test:a:2"));
        assert!(found.contains_key("tavern-test:b:1"));

        provider
            .write_values(vec![("tavern-test:b:1".to_string(), None)])
            .await
            .unwrap();
    }
}
