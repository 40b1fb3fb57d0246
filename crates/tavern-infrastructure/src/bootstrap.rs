//! Application context assembly
//!
//! Single composition point: configuration in, a populated cache
//! registry and manager out. Cache and provider instances are
//! constructed here once and live for the process lifetime; any
//! construction failure is fatal.

use crate::cache::{Cache, CacheManager, CacheRegistry, ProviderContext, ProviderFactory};
use crate::config::AppConfig;
use std::sync::Arc;
use tavern_domain::error::{Error, Result};
use tavern_domain::resolver::{ConfigurationResolver, PropertyRecord};
use tavern_domain::value_objects::TagSet;

/// The assembled application context
pub struct AppContext {
    /// The configuration the context was built from
    pub config: AppConfig,
    /// Resolver for tagged configuration lookups at runtime
    pub resolver: ConfigurationResolver,
    /// Bulk cache orchestration over the registry
    pub manager: Arc<CacheManager>,
}

/// Build the application context from configuration.
///
/// Effective settings per cache come from resolving the definition's
/// tagged overrides against the active context tags; the provider
/// factory then constructs each chain in read-precedence order.
pub fn build_context(config: AppConfig) -> Result<AppContext> {
    let context_tags = TagSet::parse_all(&config.context.tags)?;
    tracing::info!(context = %context_tags, "resolving cache configuration");

    let resolver = ConfigurationResolver::new(context_tags);
    let factory = ProviderFactory::with_defaults();
    let provider_context = ProviderContext {
        redis_url: config.redis.url.clone(),
    };

    let mut registry = CacheRegistry::new();
    for definition in &config.caches {
        let record = PropertyRecord {
            values: definition.settings.clone(),
            overrides: definition.overrides.clone(),
        };
        let settings = resolver.resolve_record(&record)?;
        if settings.providers.is_empty() {
            return Err(Error::config(format!(
                "cache '{}' resolved to an empty provider chain",
                definition.name
            )));
        }

        let props = settings.props();
        let mut providers = Vec::with_capacity(settings.providers.len());
        for kind in &settings.providers {
            providers.push(factory.create(kind, &provider_context, &props)?);
        }

        tracing::info!(
            cache = %definition.name,
            providers = ?settings.providers,
            ttl_ms = ?settings.time_to_live_ms,
            max_size = ?settings.max_size,
            "registered cache"
        );
        registry.insert(Cache::new(definition.name.clone(), props, providers));
    }

    let manager = Arc::new(CacheManager::new(Arc::new(registry)));
    Ok(AppContext {
        config,
        resolver,
        manager,
    })
}
