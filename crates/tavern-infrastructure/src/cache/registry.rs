//! Process-scoped cache registry
//!
//! Maps cache names to instances for the process lifetime. The registry
//! is an explicit object owned by the application context and threaded
//! through the layers that need it; there is no hidden global, which
//! keeps lifetimes and test isolation explicit.

use crate::cache::facade::Cache;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered cache, shared across the manager and the admin surface
pub type SharedCache = Arc<Cache<Value>>;

/// Name-keyed registry of caches, built once at bootstrap
#[derive(Default)]
pub struct CacheRegistry {
    caches: HashMap<String, SharedCache>,
}

impl CacheRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cache under its name, replacing any previous cache
    /// with the same name
    pub fn insert(&mut self, cache: Cache<Value>) {
        let name = cache.name().to_string();
        if self.caches.insert(name.clone(), Arc::new(cache)).is_some() {
            tracing::warn!(cache = %name, "replaced previously registered cache");
        }
    }

    /// Look up a cache by name
    pub fn get(&self, name: &str) -> Option<SharedCache> {
        self.caches.get(name).cloned()
    }

    /// Registered cache names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.keys().cloned().collect();
        names.sort();
        names
    }

    /// Iterate the registered caches
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SharedCache)> {
        self.caches.iter()
    }

    /// Number of registered caches
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// True iff no cache is registered
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::providers::MemoryCacheProvider;
    use std::time::Duration;
    use tavern_domain::value_objects::CacheProps;

    fn cache(name: &str) -> Cache<Value> {
        let props = CacheProps::new(Some(Duration::from_secs(60)), Some(10));
        Cache::new(
            name,
            props.clone(),
            vec![Arc::new(MemoryCacheProvider::new(props).unwrap())],
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = CacheRegistry::new();
        registry.insert(cache("sessions"));

        assert!(registry.get("sessions").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = CacheRegistry::new();
        registry.insert(cache("users"));
        registry.insert(cache("sessions"));

        assert_eq!(registry.names(), vec!["sessions", "users"]);
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut registry = CacheRegistry::new();
        registry.insert(cache("sessions"));
        registry.insert(cache("sessions"));

        assert_eq!(registry.len(), 1);
    }
}
