//! Fan-out of a single command across an explicit list of targets: concurrent
//! per-target workers with isolated failure, results aggregated in input order.

use std::time::{Duration, Instant};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::executors::{run_command, CommandResult};
use crate::pool::ConnectionPool;
use crate::target::ScoutTarget;

/// One element of a fan-out reply: spec.md §3's `BroadcastResult`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BroadcastOutcome {
    pub target: String,
    pub host_name: String,
    pub ok: bool,
    /// Command output on success, error text on failure.
    pub payload: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BroadcastResult {
    pub command: String,
    pub outcomes: Vec<BroadcastOutcome>,
}

/// Runs `command` against every target in `targets` concurrently.
///
/// Each target is a fully isolated worker: a parse failure, connect failure,
/// or command failure on one target never cancels or poisons the others, and
/// the aggregate preserves input order (not completion order) so callers get
/// a stable, diffable report across repeated broadcasts. There is no
/// implicit concurrency cap beyond the pool's own `max_pool_size` — when the
/// pool is saturated, workers simply wait on their host's creation lock.
pub async fn broadcast(
    pool: &ConnectionPool,
    targets: &[String],
    command: &str,
    timeout: Duration,
    max_output_size: u64,
) -> BroadcastResult {
    let futures = targets.iter().map(|target| async move {
        let started = Instant::now();
        let outcome = run_one(pool, target, command, timeout, max_output_size).await;
        (target.clone(), outcome, started.elapsed())
    });

    let results = futures::future::join_all(futures).await;

    let outcomes = results
        .into_iter()
        .map(|(target, outcome, elapsed)| match outcome {
            Ok((host_name, result)) => BroadcastOutcome {
                target,
                host_name,
                ok: result.exit_status == 0 && !result.timed_out,
                payload: if result.stderr.is_empty() {
                    result.stdout
                } else {
                    format!("{}\n{}", result.stdout, result.stderr)
                },
                elapsed_ms: elapsed.as_millis() as u64,
            },
            Err(e) => BroadcastOutcome {
                target: target.clone(),
                host_name: ScoutTarget::parse(&target)
                    .ok()
                    .and_then(|t| t.host().map(str::to_string))
                    .unwrap_or_default(),
                ok: false,
                payload: e.to_string(),
                elapsed_ms: elapsed.as_millis() as u64,
            },
        })
        .collect();

    BroadcastResult {
        command: command.to_string(),
        outcomes,
    }
}

/// Runs the broadcast `command` against every cataloged host. A thin
/// convenience wrapper around [`broadcast`] for the `hosts` target shorthand.
pub async fn broadcast_all_hosts(
    pool: &ConnectionPool,
    command: &str,
    timeout: Duration,
    max_output_size: u64,
) -> BroadcastResult {
    let targets: Vec<String> = pool.catalog().get_hosts().keys().cloned().collect();
    broadcast(pool, &targets, command, timeout, max_output_size).await
}

async fn run_one(
    pool: &ConnectionPool,
    target: &str,
    command: &str,
    timeout: Duration,
    max_output_size: u64,
) -> Result<(String, CommandResult), crate::error::ScoutError> {
    let parsed = ScoutTarget::parse(target)?;
    let host = parsed
        .host()
        .ok_or_else(|| crate::error::ScoutError::InvalidTarget(format!("'{target}' is not a host target")))?;
    let conn = pool.acquire_with_retry(host).await?;
    let result = run_command(&conn, command, timeout, max_output_size).await?;
    Ok((host.to_string(), result))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::{Config, HostCatalog, KnownHosts};

    use super::*;

    #[test]
    fn outcome_with_error_has_ok_false_and_payload_set() {
        let outcome = BroadcastOutcome {
            target: "web1".to_string(),
            host_name: "web1".to_string(),
            ok: false,
            payload: "connect error".to_string(),
            elapsed_ms: 12,
        };
        assert!(!outcome.ok);
        assert!(!outcome.payload.is_empty());
    }

    fn test_config() -> Config {
        Config {
            max_file_size: 1024,
            command_timeout: Duration::from_secs(1),
            idle_timeout: Duration::from_millis(10),
            max_pool_size: 4,
            ssh_connect_timeout: Duration::from_millis(50),
            known_hosts_path: KnownHosts::Disabled,
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

    /// spec.md §8 property #13: in a broadcast of N targets where every
    /// target fails to connect (none of these hosts are in the empty
    /// catalog), each failure is isolated — one target erroring never
    /// cancels or skips another — and the outcomes preserve input order
    /// rather than completion order.
    #[tokio::test]
    async fn broadcast_isolates_per_target_failures_and_preserves_input_order() {
        let pool = ConnectionPool::new(test_config(), HostCatalog::default()).expect("disabled known_hosts never fails construction");
        let targets = vec!["host-a".to_string(), "host-b".to_string(), "host-c".to_string()];

        let result = broadcast(&pool, &targets, "echo hi", Duration::from_secs(1), 4096).await;

        assert_eq!(result.command, "echo hi");
        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.outcomes[0].target, "host-a");
        assert_eq!(result.outcomes[1].target, "host-b");
        assert_eq!(result.outcomes[2].target, "host-c");
        assert!(
            result.outcomes.iter().all(|o| !o.ok),
            "none of these hosts are in the catalog, so every outcome should fail independently"
        );
        assert!(result.outcomes.iter().all(|o| !o.payload.is_empty()));
    }

    #[tokio::test]
    async fn broadcast_all_hosts_against_an_empty_catalog_returns_no_outcomes() {
        let pool = ConnectionPool::new(test_config(), HostCatalog::default()).expect("disabled known_hosts never fails construction");
        let result = broadcast_all_hosts(&pool, "echo hi", Duration::from_secs(1), 4096).await;
        assert!(result.outcomes.is_empty());
    }
}
