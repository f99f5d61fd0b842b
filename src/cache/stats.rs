//! Cache Statistics Module
//!
//! Point-in-time view of lookup hits and misses along with refresh outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Tracks lookup cache activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that resolved a username
    pub hits: u64,
    /// Lookups that found nothing in the current snapshot
    pub misses: u64,
    /// Completed rebuilds
    pub refreshes: u64,
    /// Rebuilds abandoned because the store failed
    pub failed_refreshes: u64,
    /// Users held by the current snapshot
    pub total_users: usize,
    /// Completion time of the last successful rebuild
    pub last_refresh: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the lookup hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Refresh ==
    /// Records a completed rebuild holding `total_users` users.
    pub fn record_refresh(&mut self, total_users: usize, at: DateTime<Utc>) {
        self.refreshes += 1;
        self.total_users = total_users;
        self.last_refresh = Some(at);
    }

    pub fn record_failed_refresh(&mut self) {
        self.failed_refreshes += 1;
    }
}
