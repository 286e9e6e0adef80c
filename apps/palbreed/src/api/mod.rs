//! # palbreed HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Combination table statistics
//! - `POST /lookup` - Child of two parents
//! - `POST /paths` - Shortest breeding paths, grouped by common prefix
//! - `GET /parents/{child}` - Every parent pair producing a child
//!
//! ## Configuration (Environment Variables)
//!
//! - `PALBREED_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `palbreed::api::*`)
pub use handlers::{
    health_handler, lookup_handler, parents_handler, paths_handler, status_handler,
};
pub use types::{
    ErrorResponse, HealthResponse, LookupRequest, MAX_API_PATHS, PathsRequest, StatusResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use palbreed_core::{CombinationTable, PalBreedError, SearchLimits};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the allowed CORS origins.
pub const CORS_ENV_VAR: &str = "PALBREED_CORS_ORIGINS";

/// Maximum request body size (64 KB). Requests only carry a few names.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// The table is immutable once loaded, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<CombinationTable>,
    /// Bounds used when a request does not set its own.
    pub limits: SearchLimits,
}

impl AppState {
    /// Create new app state around a loaded table.
    #[must_use]
    pub fn new(table: CombinationTable, limits: SearchLimits) -> Self {
        Self {
            table: Arc::new(table),
            limits,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `PALBREED_CORS_ORIGINS`:
/// - If "*": allows all origins
/// - If not set: defaults to localhost only
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(CORS_ENV_VAR).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins ({}=*)", CORS_ENV_VAR);
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in {}, defaulting to localhost only",
                    CORS_ENV_VAR
                );
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::debug!("CORS: No {} set, defaulting to localhost only", CORS_ENV_VAR);
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:1420",
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/lookup", post(handlers::lookup_handler))
        .route("/paths", post(handlers::paths_handler))
        .route("/parents/{child}", get(handlers::parents_handler))
        .layer(middleware)
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(
    addr: &str,
    table: CombinationTable,
    limits: SearchLimits,
) -> Result<(), PalBreedError> {
    let router = create_router(AppState::new(table, limits));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PalBreedError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("palbreed HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PalBreedError::Io(format!("Server error: {}", e)))?;

    tracing::info!("palbreed HTTP server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
