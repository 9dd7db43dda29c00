//! Background idle-session reaper.

use std::sync::Arc;
use std::time::Duration;

use log::trace;
use tokio::task::JoinHandle;

use super::ConnectionPool;

/// Spawns a task that periodically evicts idle pool entries until the pool
/// is dropped or the returned handle is aborted.
///
/// The sweep interval is half the idle timeout, floored at one second, so a
/// connection is reaped within roughly one idle-timeout window of going
/// idle rather than waiting for a fixed external tick.
pub fn spawn_reaper(pool: Arc<ConnectionPool>) -> JoinHandle<()> {
    let interval = (pool.config().idle_timeout / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            trace!("idle reaper sweep (interval {interval:?})");
            pool.sweep_idle().await;
        }
    })
}
