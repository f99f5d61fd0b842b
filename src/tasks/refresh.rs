//! Cache Refresh Task
//!
//! Background task that periodically rebuilds the user lookup cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::UserLookupCache;

/// Spawns a background task that rebuilds `cache` every `refresh_interval_secs`.
///
/// The first scheduled rebuild happens one interval after spawning; the
/// startup rebuild is expected to have run already. A failed rebuild is
/// logged by [`UserLookupCache::refresh`] and the loop carries on.
///
/// # Returns
/// A JoinHandle for the spawned task. Aborting it stops the schedule without
/// waiting for an in-flight rebuild.
///
/// # Example
/// ```ignore
/// let refresh_handle = spawn_refresh_task(cache.clone(), 60);
/// // Later, during shutdown:
/// refresh_handle.abort();
/// ```
pub fn spawn_refresh_task(
    cache: Arc<UserLookupCache>,
    refresh_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(refresh_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache refresh task with interval of {} seconds",
            refresh_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            if let Ok(total) = cache.refresh().await {
                debug!("Scheduled refresh loaded {} users", total);
            }
        }
    })
}
