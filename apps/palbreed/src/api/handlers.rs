//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{ErrorResponse, HealthResponse, LookupRequest, PathsRequest, StatusResponse},
};
use crate::cli::log_search;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use palbreed_core::query;
use std::time::Instant;

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get combination table statistics.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusResponse::from(state.table.stats())),
    )
}

// =============================================================================
// LOOKUP HANDLER
// =============================================================================

/// Find the child of two parents.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> impl IntoResponse {
    let response = query::lookup(&state.table, &request.parent1, &request.parent2);
    (StatusCode::OK, Json(response))
}

// =============================================================================
// PATHS HANDLER
// =============================================================================

/// Find the shortest breeding paths.
///
/// The search runs on the blocking pool; it is CPU-bound and may take up to
/// its time budget.
pub async fn paths_handler(
    State(state): State<AppState>,
    Json(request): Json<PathsRequest>,
) -> Response {
    let limits = match request.limits(state.limits) {
        Ok(limits) => limits,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))).into_response();
        }
    };

    let table = state.table.clone();
    let search = tokio::task::spawn_blocking(move || {
        let clock = Instant::now();
        let response = query::find_paths(&table, &request.start, &request.target, limits);
        log_search(&response, clock);
        response
    })
    .await;

    match search {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!("Path search task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Path search failed")),
            )
                .into_response()
        }
    }
}

// =============================================================================
// PARENTS HANDLER
// =============================================================================

/// List every parent pair producing a child.
pub async fn parents_handler(
    State(state): State<AppState>,
    Path(child): Path<String>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(query::parents_of(&state.table, &child)))
}
