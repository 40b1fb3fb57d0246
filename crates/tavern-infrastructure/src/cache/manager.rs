//! Cross-cache bulk orchestration
//!
//! The manager addresses caches by glob pattern and fans bulk writes
//! and evictions out across every match. A pattern matching zero caches
//! is a valid no-op, never an error; provider failures propagate to the
//! caller unwrapped and are not retried here.

use crate::cache::registry::{CacheRegistry, SharedCache};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tavern_domain::error::Result;
use tavern_domain::value_objects::{
    CacheDescriptor, CacheDetails, CacheEvictRequest, CacheSector, CacheWriteRequest, GlobMatcher,
};

/// Orchestrates glob-targeted bulk operations over the registry
#[derive(Clone)]
pub struct CacheManager {
    registry: Arc<CacheRegistry>,
}

impl CacheManager {
    /// Create a manager over a populated registry
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this manager orchestrates
    pub fn registry(&self) -> &CacheRegistry {
        &self.registry
    }

    /// Caches whose name matches any of the target patterns
    fn select(&self, patterns: &[String]) -> Result<Vec<SharedCache>> {
        let matcher = GlobMatcher::new(patterns)?;
        let mut selected: Vec<SharedCache> = self
            .registry
            .iter()
            .filter(|(name, _)| matcher.matches(name))
            .map(|(_, cache)| cache.clone())
            .collect();
        selected.sort_by(|a, b| a.name().cmp(b.name()));

        if selected.is_empty() {
            tracing::debug!(patterns = ?patterns, "bulk operation matched no caches");
        }
        Ok(selected)
    }

    /// Write the request's values to every matching cache
    pub async fn write_values(&self, request: &CacheWriteRequest) -> Result<()> {
        let caches = self.select(&request.caches)?;
        let entries: Vec<(String, Option<Value>)> = request
            .values
            .iter()
            .map(|(key, value)| (key.clone(), Some(value.clone())))
            .collect();

        tracing::debug!(
            caches = caches.len(),
            namespace = %request.namespace,
            keys = entries.len(),
            "bulk cache write"
        );
        let writes = caches
            .iter()
            .map(|cache| cache.write_values(&request.namespace, &entries));
        join_all(writes)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    /// Evict from every matching cache: by sector when sectors are
    /// given, and by namespaced key deletion when keys are given
    pub async fn evict_values(&self, request: &CacheEvictRequest) -> Result<()> {
        let caches = self.select(&request.caches)?;

        if let Some(sectors) = &request.sectors {
            let sector = CacheSector::new(sectors)?;
            tracing::debug!(caches = caches.len(), sectors = ?sectors, "bulk sector eviction");
            let evictions = caches.iter().map(|cache| cache.evict_all(&sector));
            join_all(evictions)
                .await
                .into_iter()
                .collect::<Result<Vec<_>>>()?;
        }

        if let (Some(namespace), Some(keys)) = (&request.namespace, &request.keys) {
            let deletions: Vec<(String, Option<Value>)> =
                keys.iter().map(|key| (key.clone(), None)).collect();
            tracing::debug!(
                caches = caches.len(),
                namespace = %namespace,
                keys = keys.len(),
                "bulk keyed eviction"
            );
            let writes = caches
                .iter()
                .map(|cache| cache.write_values(namespace, &deletions));
            join_all(writes)
                .await
                .into_iter()
                .collect::<Result<Vec<_>>>()?;
        }
        Ok(())
    }

    /// Descriptors for every registered cache
    pub fn get_caches(&self) -> Vec<CacheDescriptor> {
        self.registry
            .names()
            .into_iter()
            .map(|name| CacheDescriptor { name })
            .collect()
    }

    /// Detail record for one cache, or `None` for an unknown name
    pub async fn get_cache_details(&self, name: &str) -> Option<CacheDetails> {
        let cache = self.registry.get(name)?;
        Some(cache.details().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::facade::Cache;
    use crate::cache::providers::MemoryCacheProvider;
    use serde_json::json;
    use std::time::Duration;
    use tavern_domain::value_objects::CacheProps;

    fn manager(names: &[&str]) -> CacheManager {
        let mut registry = CacheRegistry::new();
        for name in names {
            let props = CacheProps::new(Some(Duration::from_secs(60)), Some(100));
            registry.insert(Cache::new(
                *name,
                props.clone(),
                vec![Arc::new(MemoryCacheProvider::new(props).unwrap())],
            ));
        }
        CacheManager::new(Arc::new(registry))
    }

    fn write_request(caches: &[&str]) -> CacheWriteRequest {
        CacheWriteRequest {
            caches: caches.iter().map(|c| c.to_string()).collect(),
            namespace: "ns1".to_string(),
            values: vec![("user-42".to_string(), json!({"id": 42}))],
        }
    }

    #[tokio::test]
    async fn test_write_reaches_every_matching_cache() {
        let manager = manager(&["sessions", "session-index", "users"]);
        manager.write_values(&write_request(&["sess*"])).await.unwrap();

        for name in ["sessions", "session-index"] {
            let cache = manager.registry().get(name).unwrap();
            let found = cache
                .fetch_values("ns1", &["user-42".to_string()])
                .await
                .unwrap();
            assert_eq!(found["user-42"]["id"], 42, "cache {name}");
        }

        let untouched = manager.registry().get("users").unwrap();
        let found = untouched
            .fetch_values("ns1", &["user-42".to_string()])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_zero_match_pattern_is_silent_noop() {
        let manager = manager(&["sessions"]);
        manager.write_values(&write_request(&["nope*"])).await.unwrap();

        let evict = CacheEvictRequest {
            caches: vec!["nope*".to_string()],
            sectors: Some(vec!["*".to_string()]),
            ..Default::default()
        };
        manager.evict_values(&evict).await.unwrap();
    }

    #[tokio::test]
    async fn test_keyed_eviction_deletes_namespaced_keys() {
        let manager = manager(&["sessions"]);
        manager.write_values(&write_request(&["sessions"])).await.unwrap();

        let evict = CacheEvictRequest {
            caches: vec!["sess*".to_string()],
            namespace: Some("ns1".to_string()),
            keys: Some(vec!["user-42".to_string()]),
            ..Default::default()
        };
        manager.evict_values(&evict).await.unwrap();

        let cache = manager.registry().get("sessions").unwrap();
        let found = cache
            .fetch_values("ns1", &["user-42".to_string()])
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_sector_eviction_spares_other_namespaces() {
        let manager = manager(&["sessions"]);
        let cache = manager.registry().get("sessions").unwrap();
        cache
            .write_values("ns1", &[("k".to_string(), Some(json!(1)))])
            .await
            .unwrap();
        cache
            .write_values("ns2", &[("k".to_string(), Some(json!(2)))])
            .await
            .unwrap();

        let evict = CacheEvictRequest {
            caches: vec!["sessions".to_string()],
            sectors: Some(vec!["ns1:*".to_string()]),
            ..Default::default()
        };
        manager.evict_values(&evict).await.unwrap();

        assert!(cache
            .fetch_values("ns1", &["k".to_string()])
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            cache.fetch_values("ns2", &["k".to_string()]).await.unwrap()["k"],
            2
        );
    }

    #[tokio::test]
    async fn test_get_caches_lists_descriptors() {
        let manager = manager(&["users", "sessions"]);
        let descriptors = manager.get_caches();
        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sessions", "users"]);
    }

    #[tokio::test]
    async fn test_details_for_unknown_cache_is_none() {
        let manager = manager(&["sessions"]);
        assert!(manager.get_cache_details("missing").await.is_none());
        assert!(manager.get_cache_details("sessions").await.is_some());
    }
}
