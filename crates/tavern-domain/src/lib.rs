//! Tavern domain layer
//!
//! Core types and contracts for the platform's caching and
//! configuration-resolution services: cache entries and their lifecycle,
//! namespace-qualified keys, glob-based targeting, the cache provider
//! port, and the tag-specificity configuration resolver. This crate is
//! pure: no I/O, no runtime state.

pub mod constants;
pub mod error;
pub mod ports;
pub mod resolver;
pub mod value_objects;

pub use error::{Error, Result};
