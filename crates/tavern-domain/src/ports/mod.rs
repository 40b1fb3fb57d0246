//! Port definitions
//!
//! Contracts implemented by the infrastructure layer.

pub mod cache_provider;

pub use cache_provider::{CacheProvider, CacheValue};
