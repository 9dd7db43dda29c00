//! `find_files`: search a remote subtree by name glob.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;
use crate::validation::{shell_quote, validate_path};

use super::{exec_raw, truncate_output};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindResult {
    pub root: String,
    pub pattern: String,
    pub matches: Vec<String>,
    pub truncated: bool,
}

/// Searches under `root` for files matching the shell glob `pattern`.
pub async fn find_files(
    conn: &PooledConnection,
    root: &str,
    pattern: &str,
    max_depth: u32,
    max_output_size: u64,
) -> Result<FindResult, ScoutError> {
    let root = validate_path(root)?;
    if pattern.is_empty() {
        return Err(ScoutError::Validation("find pattern must not be empty".to_string()));
    }

    let command = format!(
        "find {} -maxdepth {max_depth} -name {} 2>/dev/null",
        shell_quote(&root),
        shell_quote(pattern)
    );
    let (stdout, _stderr, exit_status) = exec_raw(conn, &command).await?;
    if exit_status != 0 && exit_status != 1 {
        // `find` exits 1 on partial errors (e.g. one unreadable subdir) but
        // still emits the matches it did find; only a harder failure (the
        // root itself missing) should surface as an error here.
        return Err(ScoutError::Validation(format!("no such directory: {root}")));
    }

    let (listing, truncated) = truncate_output(stdout.as_bytes(), max_output_size);
    let matches = listing.lines().map(str::to_string).collect();

    Ok(FindResult {
        root,
        pattern: pattern.to_string(),
        matches,
        truncated,
    })
}
