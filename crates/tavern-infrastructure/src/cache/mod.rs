//! Cache subsystem
//!
//! A cache is a facade over an ordered chain of providers; the registry
//! maps cache names to instances for the process lifetime; the manager
//! runs glob-targeted bulk operations across the registry.

pub mod facade;
pub mod factory;
pub mod manager;
pub mod providers;
pub mod registry;

pub use facade::Cache;
pub use factory::{ProviderContext, ProviderFactory};
pub use manager::CacheManager;
pub use registry::{CacheRegistry, SharedCache};
