//! Cache facade over an ordered provider chain
//!
//! Provider order determines read precedence: the first live hit for a
//! key wins and later providers are only consulted for keys still
//! missing. Writes and evictions fan out to every provider so a
//! lower-precedence backing store stays consistent with the layers in
//! front of it.

use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tavern_domain::error::Result;
use tavern_domain::ports::{CacheProvider, CacheValue};
use tavern_domain::value_objects::{
    physical_key, CacheDetails, CacheProps, CacheSector, ProviderDetails,
};

/// One named cache: props plus its provider chain
pub struct Cache<T: CacheValue> {
    name: String,
    props: CacheProps,
    providers: Vec<Arc<dyn CacheProvider<T>>>,
}

impl<T: CacheValue> Cache<T> {
    /// Create a cache over a provider chain in read-precedence order
    pub fn new(
        name: impl Into<String>,
        props: CacheProps,
        providers: Vec<Arc<dyn CacheProvider<T>>>,
    ) -> Self {
        Self {
            name: name.into(),
            props,
            providers,
        }
    }

    /// The cache name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The effective props this cache was built from
    pub fn props(&self) -> &CacheProps {
        &self.props
    }

    /// Fetch logical keys under a namespace.
    ///
    /// A key with no live entry in any provider is simply absent from
    /// the result; a miss is not an error. Liveness is re-validated
    /// here before a value is returned, independent of the provider.
    pub async fn fetch_values(
        &self,
        namespace: &str,
        keys: &[String],
    ) -> Result<HashMap<String, T>> {
        let now = Utc::now();
        let mut pending: Vec<(String, String)> = keys
            .iter()
            .map(|key| (key.clone(), physical_key(namespace, key)))
            .collect();
        let mut found = HashMap::new();

        for provider in &self.providers {
            if pending.is_empty() {
                break;
            }
            let physical: Vec<String> = pending.iter().map(|(_, p)| p.clone()).collect();
            let entries = provider.fetch_values(&physical).await?;
            pending.retain(|(logical, physical)| match entries.get(physical) {
                Some(entry) if entry.is_alive(now) => {
                    found.insert(logical.clone(), entry.value.clone());
                    false
                }
                _ => true,
            });
        }
        Ok(found)
    }

    /// Write logical key/value pairs under a namespace to every
    /// provider in the chain; a `None` value deletes the key.
    ///
    /// The fan-out is concurrent and independent; a partial failure
    /// leaves other providers written and surfaces the underlying
    /// error.
    pub async fn write_values(
        &self,
        namespace: &str,
        entries: &[(String, Option<T>)],
    ) -> Result<()> {
        let physical: Vec<(String, Option<T>)> = entries
            .iter()
            .map(|(key, value)| (physical_key(namespace, key), value.clone()))
            .collect();

        let writes = self
            .providers
            .iter()
            .map(|provider| provider.write_values(physical.clone()));
        join_all(writes)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Evict the sector from every provider in the chain
    pub async fn evict_all(&self, sector: &CacheSector) -> Result<()> {
        let evictions = self
            .providers
            .iter()
            .map(|provider| provider.evict_all(sector));
        join_all(evictions)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Introspection record for the admin surface.
    ///
    /// Provider counts are best-effort; a provider that fails to count
    /// reports no count rather than failing the lookup.
    pub async fn details(&self) -> CacheDetails {
        let mut providers = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            providers.push(ProviderDetails {
                kind: provider.kind().to_string(),
                entry_count: provider.entry_count().await.ok().flatten(),
            });
        }
        CacheDetails {
            name: self.name.clone(),
            time_to_live_ms: self
                .props
                .time_to_live
                .map(|ttl| ttl.as_millis() as u64),
            max_size: self.props.max_size,
            providers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::providers::MemoryCacheProvider;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tavern_domain::value_objects::CacheEntry;

    /// Wraps a provider and counts fetches, to observe chain precedence
    struct CountingProvider {
        inner: MemoryCacheProvider<Value>,
        fetches: AtomicU64,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: MemoryCacheProvider::new(CacheProps::with_max_size(100)).unwrap(),
                fetches: AtomicU64::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl CacheProvider<Value> for CountingProvider {
        fn kind(&self) -> &str {
            "counting"
        }

        async fn fetch_values(
            &self,
            keys: &[String],
        ) -> Result<HashMap<String, CacheEntry<Value>>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_values(keys).await
        }

        async fn write_values(&self, entries: Vec<(String, Option<Value>)>) -> Result<()> {
            self.inner.write_values(entries).await
        }

        async fn evict_all(&self, sector: &CacheSector) -> Result<()> {
            self.inner.evict_all(sector).await
        }

        async fn entry_count(&self) -> Result<Option<u64>> {
            self.inner.entry_count().await
        }
    }

    fn memory_cache(name: &str) -> Cache<Value> {
        let props = CacheProps::new(Some(Duration::from_secs(60)), Some(100));
        let provider = MemoryCacheProvider::new(props.clone()).unwrap();
        Cache::new(name, props, vec![Arc::new(provider)])
    }

    #[tokio::test]
    async fn test_write_then_fetch_round_trip() {
        let cache = memory_cache("sessions");
        cache
            .write_values("ns1", &[("user-42".to_string(), Some(json!({"id": 42})))])
            .await
            .unwrap();

        let found = cache
            .fetch_values("ns1", &["user-42".to_string()])
            .await
            .unwrap();
        assert_eq!(found["user-42"]["id"], 42);
    }

    #[tokio::test]
    async fn test_namespace_isolation() {
        let cache = memory_cache("sessions");
        cache
            .write_values("ns1", &[("user-42".to_string(), Some(json!("first")))])
            .await
            .unwrap();

        let other = cache
            .fetch_values("ns2", &["user-42".to_string()])
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_write_fans_out_to_every_provider() {
        let first = Arc::new(CountingProvider::new());
        let second = Arc::new(CountingProvider::new());
        let cache = Cache::new(
            "sessions",
            CacheProps::with_max_size(100),
            vec![first.clone() as Arc<dyn CacheProvider<Value>>, second.clone()],
        );

        cache
            .write_values("ns1", &[("k".to_string(), Some(json!(1)))])
            .await
            .unwrap();

        assert_eq!(first.inner.entry_count().await.unwrap(), Some(1));
        assert_eq!(second.inner.entry_count().await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_first_live_hit_never_consults_later_providers() {
        let first = Arc::new(CountingProvider::new());
        let second = Arc::new(CountingProvider::new());
        let cache = Cache::new(
            "sessions",
            CacheProps::with_max_size(100),
            vec![first.clone() as Arc<dyn CacheProvider<Value>>, second.clone()],
        );

        cache
            .write_values("ns1", &[("k".to_string(), Some(json!(1)))])
            .await
            .unwrap();

        let found = cache.fetch_values("ns1", &["k".to_string()]).await.unwrap();
        assert_eq!(found["k"], 1);
        assert_eq!(first.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(second.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_later_provider_serves_keys_missing_in_front() {
        let first = Arc::new(CountingProvider::new());
        let second = Arc::new(CountingProvider::new());
        // Seed only the second provider, bypassing the facade
        second
            .write_values(vec![("ns1:k".to_string(), Some(json!("backing")))])
            .await
            .unwrap();

        let cache = Cache::new(
            "sessions",
            CacheProps::with_max_size(100),
            vec![first as Arc<dyn CacheProvider<Value>>, second],
        );

        let found = cache.fetch_values("ns1", &["k".to_string()]).await.unwrap();
        assert_eq!(found["k"], "backing");
    }

    #[tokio::test]
    async fn test_details_reports_chain_in_order() {
        let cache = memory_cache("sessions");
        cache
            .write_values("ns1", &[("k".to_string(), Some(json!(1)))])
            .await
            .unwrap();

        let details = cache.details().await;
        assert_eq!(details.name, "sessions");
        assert_eq!(details.time_to_live_ms, Some(60_000));
        assert_eq!(details.max_size, Some(100));
        assert_eq!(details.providers.len(), 1);
        assert_eq!(details.providers[0].kind, "memory");
        assert_eq!(details.providers[0].entry_count, Some(1));
    }
}
