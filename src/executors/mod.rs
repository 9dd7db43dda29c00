//! Operation executors: each takes a pooled connection and returns a typed
//! result, applying the shared output-size cap and UTF-8 lossy decoding.

mod diff;
mod find;
mod list;
mod read;
mod run;
mod stat;
mod tree;

pub mod beam;
pub use beam::{Direction, DirectionRequest, TransferResult};

pub use diff::{diff_files, DiffResult, DEFAULT_CTX as DEFAULT_DIFF_CTX};
pub use find::{find_files, FindResult};
pub use list::{list_dir, ListEntry, ListResult};
pub use read::{read_file, ReadResult};
pub use run::{run_command, CommandResult};
pub use stat::{stat_path, StatResult};
pub use tree::{tree_dir, TreeResult};

use crate::pool::PooledConnection;

/// Truncates `bytes` to `limit`, returning the (possibly truncated) UTF-8
/// text and whether truncation occurred. Invalid UTF-8 is replaced with
/// U+FFFD rather than rejected, since remote output is attacker-adjacent
/// but not attacker-controlled in the way that would make silent mojibado
/// dangerous here.
pub(crate) fn truncate_output(bytes: &[u8], limit: u64) -> (String, bool) {
    let limit = limit as usize;
    if bytes.len() <= limit {
        return (String::from_utf8_lossy(bytes).into_owned(), false);
    }
    let mut text = String::from_utf8_lossy(&bytes[..limit]).into_owned();
    text.push_str(&format!("\n…[truncated {} bytes]", bytes.len() - limit));
    (text, true)
}

/// Runs `command` on `conn` and returns raw stdout/stderr/exit status,
/// shared by every executor that shells out rather than using SFTP.
pub(crate) async fn exec_raw(
    conn: &PooledConnection,
    command: &str,
) -> Result<(String, String, u32), crate::error::ScoutError> {
    let result = conn
        .client
        .execute(command)
        .await
        .map_err(|e| crate::error::ScoutError::Exec(format!("{} on {}: {e}", command, conn.host)))?;
    Ok((result.stdout, result.stderr, result.exit_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_output_passes_short_output_through_unchanged() {
        let (text, truncated) = truncate_output(b"hello", 100);
        assert_eq!(text, "hello");
        assert!(!truncated);
    }

    #[test]
    fn truncate_output_marks_and_shortens_long_output() {
        let (text, truncated) = truncate_output(b"0123456789", 4);
        assert!(truncated);
        assert!(text.starts_with("0123"));
        assert!(text.contains("truncated 6 bytes"));
    }

    #[test]
    fn truncate_output_replaces_invalid_utf8() {
        let (text, _) = truncate_output(&[0xff, 0xfe, b'a'], 100);
        assert!(text.ends_with('a'));
    }
}
