//! `tree_dir`: recursive directory listing, depth-bounded.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;
use crate::validation::{shell_quote, validate_path};

use super::{exec_raw, truncate_output};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TreeResult {
    pub path: String,
    pub listing: String,
    pub truncated: bool,
    pub used_fallback: bool,
}

/// Renders a recursive listing of `path`, preferring the `tree` utility and
/// falling back to `find` when `tree` is not installed on the remote host
/// (common on minimal server images).
pub async fn tree_dir(
    conn: &PooledConnection,
    path: &str,
    max_depth: u32,
    max_output_size: u64,
) -> Result<TreeResult, ScoutError> {
    let path = validate_path(path)?;
    let quoted = shell_quote(&path);

    let tree_command = format!("tree -L {max_depth} -a --noreport {quoted} 2>/dev/null");
    let (stdout, _stderr, exit_status) = exec_raw(conn, &tree_command).await?;

    let (listing, used_fallback) = if exit_status == 0 && !stdout.trim().is_empty() {
        (stdout, false)
    } else {
        let find_command = format!("find {quoted} -maxdepth {max_depth} 2>/dev/null");
        let (fallback_out, _, fallback_status) = exec_raw(conn, &find_command).await?;
        if fallback_status != 0 {
            return Err(ScoutError::Validation(format!("no such directory: {path}")));
        }
        (fallback_out, true)
    };

    let (listing, truncated) = truncate_output(listing.as_bytes(), max_output_size);
    Ok(TreeResult {
        path,
        listing,
        truncated,
        used_fallback,
    })
}
