//! `diff_files`: unified diff between two remote files, possibly on
//! different hosts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use similar::TextDiff;

use crate::error::ScoutError;
use crate::pool::PooledConnection;

use super::read::read_file;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffResult {
    pub left: String,
    pub right: String,
    pub unified_diff: String,
    pub identical: bool,
    /// True when either side was truncated before diffing, meaning the
    /// diff reflects only the compared prefixes, not full file equality.
    pub truncated: bool,
}

/// Default unified-diff context-window size, matching `similar`'s own default.
pub const DEFAULT_CTX: usize = 3;

/// Computes a unified diff between `left_path` on `left_conn` and
/// `right_path` on `right_conn`. When a file exceeds `max_file_size` its
/// content is truncated (as in `read_file`) before comparison, and the
/// result is flagged `truncated` so callers don't mistake a prefix match
/// for a full-file match. `ctx` is the number of unchanged lines of context
/// shown around each hunk.
pub async fn diff_files(
    left_conn: &PooledConnection,
    left_path: &str,
    right_conn: &PooledConnection,
    right_path: &str,
    max_file_size: u64,
    ctx: usize,
) -> Result<DiffResult, ScoutError> {
    let left = read_file(left_conn, left_path, max_file_size).await?;
    let right = read_file(right_conn, right_path, max_file_size).await?;

    let diff = diff_with_content(&left.path, &left.content, &right.path, &right.content, ctx);
    Ok(DiffResult {
        truncated: left.truncated || right.truncated,
        ..diff
    })
}

/// Diffs two in-memory texts directly, used by [`diff_files`] and
/// independently testable without a network round-trip.
pub fn diff_with_content(
    left_path: &str,
    left_content: &str,
    right_path: &str,
    right_content: &str,
    ctx: usize,
) -> DiffResult {
    let text_diff = TextDiff::from_lines(left_content, right_content);
    let unified = text_diff
        .unified_diff()
        .context_radius(ctx)
        .header(left_path, right_path)
        .to_string();

    DiffResult {
        left: left_path.to_string(),
        right: right_path.to_string(),
        identical: left_content == right_content,
        unified_diff: unified,
        truncated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_produces_empty_diff_and_identical_flag() {
        let result = diff_with_content("a.txt", "same\n", "b.txt", "same\n", DEFAULT_CTX);
        assert!(result.identical);
        assert!(result.unified_diff.is_empty());
    }

    #[test]
    fn differing_content_produces_a_nonempty_unified_diff() {
        let result = diff_with_content("a.txt", "one\ntwo\n", "b.txt", "one\nthree\n", DEFAULT_CTX);
        assert!(!result.identical);
        assert!(result.unified_diff.contains("-two"));
        assert!(result.unified_diff.contains("+three"));
    }

    #[test]
    fn smaller_context_window_produces_fewer_unchanged_lines() {
        let left = "a\nb\nc\nd\ne\nf\ng\n";
        let right = "a\nb\nc\nd\ne\nf\nCHANGED\n";
        let wide = diff_with_content("a.txt", left, "b.txt", right, 5);
        let narrow = diff_with_content("a.txt", left, "b.txt", right, 1);
        assert!(narrow.unified_diff.len() < wide.unified_diff.len());
    }
}
