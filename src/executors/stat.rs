//! `stat_path`: existence and metadata of a single remote path.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;
use crate::validation::{shell_quote, validate_path};

use super::exec_raw;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatResult {
    pub path: String,
    pub exists: bool,
    pub is_dir: bool,
    pub is_file: bool,
    pub size_bytes: u64,
    pub modified_unix: u64,
}

/// Stats `path` on the host behind `conn` via `stat -c`.
///
/// A non-zero exit (path not found, permission denied) is reported as
/// `exists: false` rather than an error, matching the POSIX convention
/// that "does not exist" is a normal outcome of stat, not a failure mode.
pub async fn stat_path(conn: &PooledConnection, path: &str) -> Result<StatResult, ScoutError> {
    let path = validate_path(path)?;
    let command = format!("stat -c '%s %F %Y' {} 2>/dev/null", shell_quote(&path));
    let (stdout, _stderr, exit_status) = exec_raw(conn, &command).await?;

    if exit_status != 0 {
        return Ok(StatResult {
            path,
            exists: false,
            is_dir: false,
            is_file: false,
            size_bytes: 0,
            modified_unix: 0,
        });
    }

    let mut fields = stdout.trim().splitn(3, ' ');
    let size_bytes: u64 = fields.next().unwrap_or("0").parse().unwrap_or(0);
    let kind = fields.next().unwrap_or("");
    let modified_unix: u64 = fields.next().unwrap_or("0").parse().unwrap_or(0);

    Ok(StatResult {
        path,
        exists: true,
        is_dir: kind.contains("directory"),
        is_file: kind.contains("regular"),
        size_bytes,
        modified_unix,
    })
}
