//! Admin API
//!
//! Routes, handlers and request/response models for the cache
//! administration endpoints.

pub mod handlers;
pub mod models;
pub mod routes;
