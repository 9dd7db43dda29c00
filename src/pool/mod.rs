//! The SSH connection pool: a meta-lock-guarded, insertion-ordered LRU map
//! of live sessions, with a per-host lock tier that serializes concurrent
//! dials to the same host without blocking dials to other hosts.

mod dial;
mod reaper;

pub use reaper::spawn_reaper;

use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use async_ssh2_tokio::client::Client;
use dashmap::DashMap;
use indexmap::IndexMap;
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::config::{Config, HostCatalog, KnownHosts};
use crate::error::ScoutError;

/// A live SSH session plus its own LRU bookkeeping.
pub struct PooledConnection {
    pub client: Client,
    pub host: String,
    last_used: StdMutex<Instant>,
}

impl PooledConnection {
    fn new(client: Client, host: String) -> Self {
        Self {
            client,
            host,
            last_used: StdMutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_used.lock().expect("pooled connection mutex poisoned") = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        Instant::now().duration_since(*self.last_used.lock().expect("pooled connection mutex poisoned"))
    }
}

/// Shared, per-host-locked, LRU-bounded pool of SSH sessions.
///
/// Two lock tiers are used deliberately: the meta-lock (`entries`) guards
/// the map itself and is held only for the instant needed to read or
/// splice an entry, while a per-host lock (from `host_locks`) is held for
/// the full duration of a dial so that two concurrent requests for the
/// same host serialize onto one connection instead of racing two dials.
pub struct ConnectionPool {
    entries: Mutex<IndexMap<String, Arc<PooledConnection>>>,
    host_locks: DashMap<String, Arc<Mutex<()>>>,
    catalog: HostCatalog,
    config: Config,
    max_size: usize,
}

impl ConnectionPool {
    /// Constructs the pool, failing closed per spec.md §4.3: a configured
    /// `known_hosts` path that does not exist on disk is a fatal
    /// configuration error regardless of `strict_host_key_checking` (a
    /// missing file means verification silently can't happen at all, which
    /// is worse than strict failure), and the `none` sentinel gets a
    /// prominent startup warning since it disables host-key verification
    /// entirely.
    pub fn new(config: Config, catalog: HostCatalog) -> Result<Arc<Self>, ScoutError> {
        match &config.known_hosts_path {
            KnownHosts::Disabled => {
                warn!("known_hosts verification is DISABLED (SCOUT_KNOWN_HOSTS=none) — SSH host keys will not be checked");
            }
            KnownHosts::Path(path) if !path.exists() => {
                return Err(ScoutError::Config(format!(
                    "known_hosts file not found: {} (set SCOUT_KNOWN_HOSTS=none to disable verification)",
                    path.display()
                )));
            }
            KnownHosts::Path(_) => {}
        }

        let max_size = config.max_pool_size;
        Ok(Arc::new(Self {
            entries: Mutex::new(IndexMap::new()),
            host_locks: DashMap::new(),
            catalog,
            config,
            max_size,
        }))
    }

    pub fn catalog(&self) -> &HostCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a pooled or freshly dialed session for `host_name`.
    ///
    /// Fast path: a read under the meta-lock alone. Slow path: acquire the
    /// per-host lock, re-check under it (another task may have dialed while
    /// we waited), then dial and splice the entry in.
    pub async fn acquire(&self, host_name: &str) -> Result<Arc<PooledConnection>, ScoutError> {
        if let Some(conn) = self.try_get(host_name).await {
            return Ok(conn);
        }

        let host_lock = self.host_lock(host_name);
        let _guard = host_lock.lock().await;

        if let Some(conn) = self.try_get(host_name).await {
            return Ok(conn);
        }

        let host = self
            .catalog
            .get_host(host_name)
            .ok_or_else(|| ScoutError::UnknownHost(host_name.to_string()))?
            .clone();

        let client = dial::dial(&host, &self.config).await?;
        let conn = Arc::new(PooledConnection::new(client, host_name.to_string()));
        self.insert(host_name.to_string(), conn.clone()).await;
        debug!("dialed new session for '{host_name}', pool now has {} entries", self.entries.lock().await.len());
        Ok(conn)
    }

    /// Like [`Self::acquire`], but on a retryable connect error the stale
    /// entry is evicted and exactly one more dial is attempted.
    pub async fn acquire_with_retry(&self, host_name: &str) -> Result<Arc<PooledConnection>, ScoutError> {
        match self.acquire(host_name).await {
            Ok(conn) => Ok(conn),
            Err(e) if e.is_retryable_connect_error() => {
                warn!("retrying connect to '{host_name}' after: {e}");
                self.invalidate(host_name).await;
                self.acquire(host_name).await
            }
            Err(e) => Err(e),
        }
    }

    /// Drops a cached entry, forcing the next `acquire` to redial.
    pub async fn invalidate(&self, host_name: &str) {
        let mut entries = self.entries.lock().await;
        entries.shift_remove(host_name);
    }

    /// Evicts every entry whose idle time exceeds the configured timeout.
    /// Called by the background reaper, but safe to call directly (tests do).
    pub async fn sweep_idle(&self) {
        let idle_timeout = self.config.idle_timeout;
        let mut entries = self.entries.lock().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, conn)| conn.idle_for() > idle_timeout)
            .map(|(k, _)| k.clone())
            .collect();
        for key in stale {
            debug!("reaping idle session for '{key}'");
            entries.shift_remove(&key);
        }
    }

    /// Drops every pooled session. Called at shutdown.
    pub async fn shutdown(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn try_get(&self, host_name: &str) -> Option<Arc<PooledConnection>> {
        let mut entries = self.entries.lock().await;
        let conn = entries.get(host_name)?.clone();
        conn.touch();
        entries.shift_remove(host_name);
        entries.insert(host_name.to_string(), conn.clone());
        Some(conn)
    }

    async fn insert(&self, host_name: String, conn: Arc<PooledConnection>) {
        let mut entries = self.entries.lock().await;
        entries.insert(host_name, conn);
        while entries.len() > self.max_size {
            let Some((oldest, _)) = entries.iter().next() else {
                break;
            };
            let oldest = oldest.clone();
            debug!("evicting LRU session for '{oldest}' (pool over max_pool_size)");
            entries.shift_remove(&oldest);
        }
    }

    fn host_lock(&self, host_name: &str) -> Arc<Mutex<()>> {
        self.host_locks
            .entry(host_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SSHHost;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            max_file_size: 1024,
            command_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_millis(10),
            max_pool_size: 2,
            ssh_connect_timeout: Duration::from_secs(1),
            known_hosts_path: crate::config::KnownHosts::Disabled,
            strict_host_key_checking: false,
            api_keys: Vec::new(),
            rate_limit_per_minute: 60,
            rate_limit_burst: 10,
            max_output_size: 1024,
            log_payloads: false,
            slow_threshold_ms: 1000,
            ssh_config_path: PathBuf::new(),
        }
    }

    fn fake_catalog() -> HostCatalog {
        HostCatalog::default()
    }

    #[test]
    fn construction_fails_closed_when_known_hosts_file_is_missing() {
        let mut config = test_config();
        config.known_hosts_path = crate::config::KnownHosts::Path(PathBuf::from("/nonexistent/known_hosts"));
        config.strict_host_key_checking = false; // must fail even when not strict
        let err = ConnectionPool::new(config, fake_catalog()).unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn construction_succeeds_when_known_hosts_is_disabled() {
        let pool = ConnectionPool::new(test_config(), fake_catalog());
        assert!(pool.is_ok());
    }

    #[test]
    fn construction_succeeds_when_known_hosts_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("known_hosts");
        std::fs::write(&path, "").unwrap();
        let mut config = test_config();
        config.known_hosts_path = crate::config::KnownHosts::Path(path);
        assert!(ConnectionPool::new(config, fake_catalog()).is_ok());
    }

    #[tokio::test]
    async fn acquire_of_unknown_host_is_unknown_host_error() {
        let pool = ConnectionPool::new(test_config(), fake_catalog()).expect("disabled known_hosts never fails construction");
        let err = pool.acquire("nope").await.unwrap_err();
        assert!(matches!(err, ScoutError::UnknownHost(_)));
    }

    #[tokio::test]
    async fn sweep_idle_is_a_noop_on_an_empty_pool() {
        let pool = ConnectionPool::new(test_config(), fake_catalog()).expect("disabled known_hosts never fails construction");
        pool.sweep_idle().await;
        assert_eq!(pool.len().await, 0);
    }

    #[test]
    fn pooled_connection_host_field_is_used_for_bookkeeping_not_equality() {
        // PooledConnection deliberately has no PartialEq: identity is the map key.
        let _ = PathBuf::from("/nonexistent");
        let _host = SSHHost {
            name: "x".to_string(),
            hostname: "x".to_string(),
            user: "root".to_string(),
            port: 22,
            identity_file: None,
            is_localhost: false,
        };
    }
}
