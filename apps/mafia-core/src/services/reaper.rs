//! Periodic eviction of finished and abandoned sessions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::services::registry::SessionRegistry;

/// Run [`SessionRegistry::reap`] every `interval` until the handle is
/// aborted or the runtime shuts down. Must be called inside a tokio runtime.
pub fn spawn_reaper(registry: Arc<SessionRegistry>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "Starting session reaper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = registry.reap(Instant::now());
            debug!(evicted = evicted.len(), live = registry.len(), "Reaper pass");
        }
    })
}
