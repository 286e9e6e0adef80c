//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Query responses (`LookupResponse`, `PathsResponse`, `ParentsResponse`)
//! come straight from `palbreed_core::query`; only the request bodies and
//! the service-level responses live here.

use palbreed_core::{SearchLimits, TableStats};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest `max_paths` a client may ask for.
pub const MAX_API_PATHS: usize = 1000;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Combination table statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub pal_count: usize,
    pub combination_count: usize,
    pub skipped_rows: usize,
}

impl From<TableStats> for StatusResponse {
    fn from(stats: TableStats) -> Self {
        Self {
            pal_count: stats.pal_count,
            combination_count: stats.combination_count,
            skipped_rows: stats.skipped_rows,
        }
    }
}

// =============================================================================
// LOOKUP REQUEST
// =============================================================================

/// Child-of-two-parents request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub parent1: String,
    pub parent2: String,
}

// =============================================================================
// PATHS REQUEST
// =============================================================================

/// Shortest-path request. Omitted bounds fall back to the server's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsRequest {
    pub start: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_seconds: Option<f64>,
}

impl PathsRequest {
    /// Merge the request's bounds over `defaults`, validating them.
    ///
    /// - `max_paths` must be within `1..=MAX_API_PATHS`
    /// - `max_seconds` must be finite and non-negative
    pub fn limits(&self, defaults: SearchLimits) -> Result<SearchLimits, String> {
        let max_paths = match self.max_paths {
            Some(n) if n == 0 || n > MAX_API_PATHS => {
                return Err(format!(
                    "max_paths must be between 1 and {} (got {})",
                    MAX_API_PATHS, n
                ));
            }
            Some(n) => n,
            None => defaults.max_paths,
        };

        let max_duration = match self.max_seconds {
            Some(seconds) => Some(Duration::try_from_secs_f64(seconds).map_err(|_| {
                format!(
                    "max_seconds must be a finite, non-negative number (got {})",
                    seconds
                )
            })?),
            None => defaults.max_duration,
        };

        Ok(SearchLimits::new(max_paths, max_duration))
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of a rejected request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
