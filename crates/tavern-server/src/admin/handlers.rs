//! Admin request handlers
//!
//! HTTP handlers for cache introspection and glob-targeted bulk
//! operations. Handlers translate bodies into manager request types and
//! map domain errors onto status codes; no cache semantics live here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tavern_domain::error::Error;
use tavern_domain::value_objects::{CacheEvictRequest, CacheWriteRequest};
use tavern_infrastructure::cache::CacheManager;

use super::models::{ErrorResponse, EvictBody, HealthResponse, OneOrMany, StatusResponse, WriteBody};

/// Shared handler state
#[derive(Clone)]
pub struct AdminState {
    /// Bulk cache orchestration
    pub manager: Arc<CacheManager>,
}

/// Domain error mapped onto an HTTP response
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Config { .. } | Error::InvalidArgument { .. } | Error::Json { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::Transport { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self.0, "admin request failed");
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Health probe
pub async fn health(State(state): State<AdminState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        caches: state.manager.registry().len(),
    })
}

/// `GET /cache` - descriptors for every registered cache
pub async fn list_caches(State(state): State<AdminState>) -> impl IntoResponse {
    Json(state.manager.get_caches())
}

/// `GET /cache/{name}` - detail record or not-found
pub async fn cache_details(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Response {
    match state.manager.get_cache_details(&name).await {
        Some(details) => (StatusCode::OK, Json(details)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("cache '{name}' not found"),
            }),
        )
            .into_response(),
    }
}

/// `POST /cache/write` - bulk write across matching caches
pub async fn write_values(
    State(state): State<AdminState>,
    Json(body): Json<WriteBody>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = CacheWriteRequest {
        caches: body.caches.into_vec(),
        namespace: body.namespace,
        values: body.values,
    };
    state.manager.write_values(&request).await?;
    Ok(Json(StatusResponse::ok()))
}

/// `POST /cache/evict` - bulk eviction across matching caches
pub async fn evict_values(
    State(state): State<AdminState>,
    Json(body): Json<EvictBody>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request = CacheEvictRequest {
        caches: body.caches.into_vec(),
        sectors: body.sectors.map(OneOrMany::into_vec),
        namespace: body.namespace,
        keys: body.keys.map(OneOrMany::into_vec),
    };
    state.manager.evict_values(&request).await?;
    Ok(Json(StatusResponse::ok()))
}
