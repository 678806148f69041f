//! Response DTOs for the wish relay API
//!
//! Defines the structure of outgoing HTTP response bodies. Bodies follow
//! the backend's `{ success, data | error }` envelope so clients can treat
//! the relay and the backend alike.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{FieldError, Wish, WishPage};

/// Where a `GET /wishes` response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheSource {
    /// Served from a fresh cache entry
    Fresh,
    /// Served from a stale entry; a background refresh was scheduled
    Stale,
    /// Fetched from the backend
    Miss,
}

/// Response body for `GET /wishes`
#[derive(Debug, Clone, Serialize)]
pub struct WishesResponse {
    pub success: bool,
    pub data: WishPage,
    pub cache: CacheSource,
    /// Age of the served entry in milliseconds
    pub age_ms: u64,
}

impl WishesResponse {
    pub fn new(data: WishPage, cache: CacheSource, age_ms: u64) -> Self {
        Self {
            success: true,
            data,
            cache,
            age_ms,
        }
    }
}

/// Response body for `POST /wishes`
#[derive(Debug, Clone, Serialize)]
pub struct CreatedWishResponse {
    pub success: bool,
    pub data: Wish,
}

impl CreatedWishResponse {
    pub fn new(data: Wish) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response body for cache maintenance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub success: bool,
    /// Number of entries removed
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            success: true,
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub stale_hits: u64,
    pub evictions: u64,
    pub size: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            stale_hits: stats.stale_hits,
            evictions: stats.evictions,
            size: stats.size,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Error message describing what went wrong
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    /// Suggested wait in seconds before trying again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: Vec::new(),
            retry_after: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_retry_after(mut self, retry_after: Option<u64>) -> Self {
        self.retry_after = retry_after;
        self
    }
}
