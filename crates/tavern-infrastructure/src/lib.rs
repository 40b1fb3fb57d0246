//! Tavern infrastructure layer
//!
//! Concrete cache providers (in-process Moka, remote Redis), the cache
//! facade/registry/manager orchestration, the provider factory,
//! configuration loading and the bootstrap wiring that assembles the
//! application context.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod logging;

pub use bootstrap::{build_context, AppContext};
pub use cache::{Cache, CacheManager, CacheRegistry, ProviderContext, ProviderFactory};
