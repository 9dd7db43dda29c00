//! `run_command`: execute an arbitrary command line on a host, with a dual
//! timeout layer — the remote `timeout(1)` wrapper plus a local
//! `tokio::time::timeout` in case the remote shell never returns control.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;

use super::{exec_raw, truncate_output};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommandResult {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_status: u32,
    pub truncated: bool,
    pub timed_out: bool,
}

/// Runs `command` with a `timeout` budget, enforced both remotely (so the
/// remote process is actually killed, not just abandoned) and locally (so a
/// remote `timeout` binary that is missing or broken cannot hang the pool).
pub async fn run_command(
    conn: &PooledConnection,
    command: &str,
    timeout: Duration,
    max_output_size: u64,
) -> Result<CommandResult, ScoutError> {
    let timeout_secs = timeout.as_secs().max(1);
    let wrapped = format!("timeout {timeout_secs}s {command}");

    let local_budget = timeout + Duration::from_secs(2);
    let outcome = tokio::time::timeout(local_budget, exec_raw(conn, &wrapped)).await;

    let (stdout, stderr, exit_status, timed_out) = match outcome {
        Ok(Ok((stdout, stderr, exit_status))) => {
            // POSIX `timeout(1)` exits 124 when it had to kill the child.
            (stdout, stderr, exit_status, exit_status == 124)
        }
        Ok(Err(e)) => return Err(e),
        Err(_) => (String::new(), String::new(), 124, true),
    };

    let (stdout, stdout_truncated) = truncate_output(stdout.as_bytes(), max_output_size);
    let (stderr, stderr_truncated) = truncate_output(stderr.as_bytes(), max_output_size);

    Ok(CommandResult {
        command: command.to_string(),
        stdout,
        stderr,
        exit_status,
        truncated: stdout_truncated || stderr_truncated,
        timed_out,
    })
}
