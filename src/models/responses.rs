//! Response DTOs for the posting API
//!
//! Defines the structure of outgoing HTTP response bodies. Users, posts and
//! pages are serialized directly from the cache record types.

use serde::Serialize;

use crate::cache::{CacheState, CacheStats};

fn state_label(state: CacheState) -> &'static str {
    match state {
        CacheState::Uninitialized => "uninitialized",
        CacheState::Populated => "populated",
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups that found a user
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Completed rebuilds
    pub refreshes: u64,
    /// Rebuilds that failed
    pub failed_refreshes: u64,
    /// Users in the current snapshot
    pub total_users: usize,
    /// RFC 3339 time of the last successful rebuild
    pub last_refresh: Option<String>,
    /// "uninitialized" or "populated"
    pub state: &'static str,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, state: CacheState) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
            refreshes: stats.refreshes,
            failed_refreshes: stats.failed_refreshes,
            total_users: stats.total_users,
            last_refresh: stats.last_refresh.map(|at| at.to_rfc3339()),
            state: state_label(state),
        }
    }
}

/// Response body for a forced rebuild (POST /api/admin/refresh)
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    /// Success message
    pub message: String,
    /// Users loaded by the rebuild
    pub total_users: usize,
}

impl RefreshResponse {
    pub fn new(total_users: usize) -> Self {
        Self {
            message: format!("Cache refreshed with {} users", total_users),
            total_users,
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
    /// Lookup cache state
    pub cache: &'static str,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(state: CacheState) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache: state_label(state),
        }
    }
}
