//! Cache provider factory
//!
//! Creates provider instances from configuration through a registry
//! keyed by provider-type string. New provider types register a
//! constructor; nothing in dispatch changes when one is added.

use crate::cache::providers::{
    MemoryCacheProvider, RedisCacheProvider, MEMORY_PROVIDER_KIND, REDIS_PROVIDER_KIND,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tavern_domain::error::{Error, Result};
use tavern_domain::ports::CacheProvider;
use tavern_domain::value_objects::CacheProps;

/// A constructed provider, as stored in a cache's chain
pub type SharedProvider = Arc<dyn CacheProvider<Value>>;

/// Constructor registered for one provider type
pub type ProviderConstructor =
    Arc<dyn Fn(&ProviderContext, &CacheProps) -> Result<SharedProvider> + Send + Sync>;

/// Shared infrastructure handles a constructor may need
#[derive(Debug, Clone)]
pub struct ProviderContext {
    /// Connection URL for Redis-backed providers
    pub redis_url: String,
}

/// Provider-type keyed constructor registry
#[derive(Clone, Default)]
pub struct ProviderFactory {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderFactory {
    /// An empty factory with no registered types
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory with the built-in provider types registered
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(MEMORY_PROVIDER_KIND, |_, props| {
            Ok(Arc::new(MemoryCacheProvider::<Value>::new(props.clone())?) as SharedProvider)
        });
        factory.register(REDIS_PROVIDER_KIND, |context, props| {
            Ok(
                Arc::new(RedisCacheProvider::<Value>::new(&context.redis_url, props.clone())?)
                    as SharedProvider,
            )
        });
        factory
    }

    /// Register a constructor under a provider-type string
    pub fn register<K, F>(&mut self, kind: K, constructor: F)
    where
        K: Into<String>,
        F: Fn(&ProviderContext, &CacheProps) -> Result<SharedProvider> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.into(), Arc::new(constructor));
    }

    /// Construct a provider of the given type.
    ///
    /// An unregistered type is a configuration error; constructor
    /// failures (incompatible props, bad URLs) propagate as raised.
    pub fn create(
        &self,
        kind: &str,
        context: &ProviderContext,
        props: &CacheProps,
    ) -> Result<SharedProvider> {
        let constructor = self.constructors.get(kind).ok_or_else(|| {
            Error::config(format!("unknown cache provider type '{kind}'"))
        })?;
        constructor(context, props)
    }

    /// Registered provider-type strings, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}
