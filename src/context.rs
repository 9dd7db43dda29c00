//! The composition root: `Config`, `HostCatalog`, and `ConnectionPool` are
//! constructed once here and threaded explicitly through the rest of the
//! crate. There is no global singleton — every layer that needs state takes
//! an `&AppContext` (or `Arc<AppContext>` for `axum` state) instead of
//! reaching for a `static`.

use std::sync::Arc;

use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota};
use tokio::task::JoinHandle;

use crate::config::{Config, HostCatalog};
use crate::error::ScoutError;
use crate::pool::{spawn_reaper, ConnectionPool};

pub type RateLimiter = DefaultKeyedRateLimiter<String>;

/// Shared application state, constructed once in `main` and cloned cheaply
/// (everything inside is an `Arc`) into every request handler.
pub struct AppContext {
    pub config: Config,
    pub pool: Arc<ConnectionPool>,
    pub rate_limiter: Arc<RateLimiter>,
    reaper_handle: JoinHandle<()>,
}

impl AppContext {
    /// Loads configuration from the environment, parses the SSH host
    /// catalog, and spins up the connection pool and its idle reaper.
    pub fn bootstrap() -> Result<Self, ScoutError> {
        let config = Config::from_env()?;
        let catalog = HostCatalog::load(&config.ssh_config_path)?;
        Self::new(config, catalog)
    }

    /// Builds a context from an already-resolved `Config`/`HostCatalog`,
    /// bypassing the environment and filesystem. Used by tests and by any
    /// embedder that resolves its own configuration.
    ///
    /// Fails when the configured `known_hosts` file is missing (see
    /// `ConnectionPool::new`) — this is the single place that check can
    /// surface as a fatal startup error rather than a later failed dial.
    pub fn new(config: Config, catalog: HostCatalog) -> Result<Self, ScoutError> {
        let per_minute = NonZeroU32::new(config.rate_limit_per_minute)
            .unwrap_or_else(|| NonZeroU32::new(60).expect("60 is nonzero"));
        let burst = NonZeroU32::new(config.rate_limit_burst)
            .unwrap_or_else(|| NonZeroU32::new(10).expect("10 is nonzero"));
        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::keyed(quota));

        let pool = ConnectionPool::new(config.clone(), catalog)?;
        let reaper_handle = spawn_reaper(pool.clone());

        Ok(Self {
            config,
            pool,
            rate_limiter,
            reaper_handle,
        })
    }

    /// Stops the reaper task and drains the pool. Idempotent.
    pub async fn shutdown(self) {
        self.reaper_handle.abort();
        self.pool.shutdown().await;
    }
}
