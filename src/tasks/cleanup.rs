//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from every
//! resolver cache, so keys that are never read again do not pile up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::resolver::Resolver;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task runs until aborted; keep the returned handle to stop it during
/// graceful shutdown.
///
/// # Example
/// ```ignore
/// let cleanup_handle = spawn_cleanup_task(resolver.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(resolver: Resolver, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = resolver.sweep_expired().await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
