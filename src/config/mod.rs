//! Runtime configuration: env-overridable tunables plus the SSH host catalog.
//!
//! Two env prefixes are accepted for every tunable: the current `SCOUT_*`
//! and the legacy `MCP_CAT_*`, with `SCOUT_*` winning when both are set.

mod host;

pub use host::{HostCatalog, SSHHost};

use std::path::PathBuf;
use std::time::Duration;

/// All runtime tunables, loaded once at startup and shared read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_file_size: u64,
    pub command_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_pool_size: usize,
    pub ssh_connect_timeout: Duration,
    pub known_hosts_path: KnownHosts,
    pub strict_host_key_checking: bool,
    pub api_keys: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub max_output_size: u64,
    pub log_payloads: bool,
    pub slow_threshold_ms: u64,
    pub ssh_config_path: PathBuf,
}

/// Resolved `known_hosts` setting: either a concrete path or the `none` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownHosts {
    Path(PathBuf),
    Disabled,
}

impl Config {
    /// Builds the tunables from the environment, falling back to spec defaults.
    ///
    /// Returns an error (the process should then exit non-zero) when
    /// `max_pool_size <= 0`.
    pub fn from_env() -> Result<Self, crate::error::ScoutError> {
        let max_pool_size = env_usize("MAX_POOL_SIZE", 100);
        if max_pool_size == 0 {
            return Err(crate::error::ScoutError::Config(
                "MAX_POOL_SIZE must be a positive integer".to_string(),
            ));
        }

        let known_hosts_raw = env_string(
            "KNOWN_HOSTS",
            default_known_hosts_path().to_string_lossy().into_owned(),
        );
        let known_hosts_path = if known_hosts_raw.eq_ignore_ascii_case("none") {
            KnownHosts::Disabled
        } else {
            KnownHosts::Path(PathBuf::from(known_hosts_raw))
        };

        let api_keys = env_string("API_KEYS", String::new())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            max_file_size: env_u64("MAX_FILE_SIZE", 1024 * 1024),
            command_timeout: Duration::from_secs(env_u64("COMMAND_TIMEOUT", 30)),
            idle_timeout: Duration::from_secs(env_u64("IDLE_TIMEOUT", 60)),
            max_pool_size,
            ssh_connect_timeout: Duration::from_secs(env_u64("SSH_CONNECT_TIMEOUT", 30)),
            known_hosts_path,
            strict_host_key_checking: env_bool("STRICT_HOST_KEY_CHECKING", true),
            api_keys,
            rate_limit_per_minute: env_usize("RATE_LIMIT_PER_MINUTE", 60) as u32,
            rate_limit_burst: env_usize("RATE_LIMIT_BURST", 10) as u32,
            max_output_size: env_u64("MAX_OUTPUT_SIZE", 10 * 1024 * 1024),
            log_payloads: env_bool("LOG_PAYLOADS", false),
            slow_threshold_ms: env_u64("SLOW_THRESHOLD_MS", 1000),
            ssh_config_path: PathBuf::from(env_string(
                "SSH_CONFIG",
                default_ssh_config_path().to_string_lossy().into_owned(),
            )),
        })
    }
}

/// Default path to the OpenSSH client config this crate derives its host
/// catalog from, before any `SCOUT_SSH_CONFIG`/`MCP_CAT_SSH_CONFIG` override.
pub fn default_ssh_config_path() -> PathBuf {
    dirs_home().join(".ssh").join("config")
}

fn default_known_hosts_path() -> PathBuf {
    dirs_home().join(".ssh").join("known_hosts")
}

fn dirs_home() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/root"))
}

/// Reads `SCOUT_<suffix>`, falling back to legacy `MCP_CAT_<suffix>`, then `default`.
fn env_string(suffix: &str, default: String) -> String {
    std::env::var(format!("SCOUT_{suffix}"))
        .or_else(|_| std::env::var(format!("MCP_CAT_{suffix}")))
        .unwrap_or(default)
}

fn env_u64(suffix: &str, default: u64) -> u64 {
    env_string(suffix, default.to_string())
        .parse()
        .unwrap_or(default)
}

fn env_usize(suffix: &str, default: usize) -> usize {
    env_string(suffix, default.to_string())
        .parse()
        .unwrap_or(default)
}

fn env_bool(suffix: &str, default: bool) -> bool {
    match env_string(suffix, default.to_string()).to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
