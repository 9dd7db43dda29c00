//! `cat_file`: read a remote file, capped at `max_file_size`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;
use crate::validation::{shell_quote, validate_path};

use super::exec_raw;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadResult {
    pub path: String,
    pub content: String,
    pub truncated: bool,
}

/// Reads `path`, capping the transferred bytes at `conn`'s configured
/// `max_file_size` via `head -c` on the remote side rather than pulling the
/// whole file and truncating locally — this bounds the bytes that cross the
/// wire, not just the bytes kept in memory afterward.
pub async fn read_file(conn: &PooledConnection, path: &str, max_file_size: u64) -> Result<ReadResult, ScoutError> {
    let path = validate_path(path)?;
    let probe = format!("stat -c '%s' {} 2>/dev/null", shell_quote(&path));
    let (size_out, _, size_status) = exec_raw(conn, &probe).await?;
    if size_status != 0 {
        return Err(ScoutError::Validation(format!("no such file: {path}")));
    }
    let total_size: u64 = size_out.trim().parse().unwrap_or(0);

    let command = format!("head -c {} {}", max_file_size, shell_quote(&path));
    let (stdout, _stderr, exit_status) = exec_raw(conn, &command).await?;
    if exit_status != 0 {
        return Err(ScoutError::Exec(format!("failed to read {path}")));
    }

    Ok(ReadResult {
        path,
        content: stdout,
        truncated: total_size > max_file_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_result_serializes_with_expected_fields() {
        let result = ReadResult {
            path: "/tmp/a".to_string(),
            content: "hi".to_string(),
            truncated: false,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["path"], "/tmp/a");
        assert_eq!(json["truncated"], false);
    }
}
