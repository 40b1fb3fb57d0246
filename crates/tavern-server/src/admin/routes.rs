//! Admin API routes
//!
//! Route definitions for the cache administration endpoints.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{
    cache_details, evict_values, health, list_caches, write_values, AdminState,
};

/// Create the admin API router
///
/// Routes:
/// - GET /health - Health probe
/// - GET /cache - List registered caches
/// - GET /cache/{name} - Cache detail or 404
/// - POST /cache/write - Glob-targeted bulk write
/// - POST /cache/evict - Glob-targeted bulk eviction
pub fn admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/cache", get(list_caches))
        .route("/cache/{name}", get(cache_details))
        .route("/cache/write", post(write_values))
        .route("/cache/evict", post(evict_values))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
