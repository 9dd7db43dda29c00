//! `ls_dir`: list the immediate children of a remote directory.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::pool::PooledConnection;
use crate::validation::{shell_quote, validate_path};

use super::{exec_raw, truncate_output};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListResult {
    pub path: String,
    pub entries: Vec<ListEntry>,
    pub truncated: bool,
}

/// Lists `path`'s immediate children using `find -maxdepth 1` with a
/// `printf`-style format line, rather than parsing `ls -l` column output,
/// which is explicitly unstable across locales and coreutils versions.
///
/// Like every other executor that returns remote output, the raw listing is
/// capped at `max_output_size` before being parsed into entries.
pub async fn list_dir(conn: &PooledConnection, path: &str, max_output_size: u64) -> Result<ListResult, ScoutError> {
    let path = validate_path(path)?;
    let command = format!(
        "find {} -mindepth 1 -maxdepth 1 -printf '%y %s %f\\n' 2>/dev/null",
        shell_quote(&path)
    );
    let (stdout, _stderr, exit_status) = exec_raw(conn, &command).await?;
    if exit_status != 0 {
        return Err(ScoutError::Validation(format!("no such directory: {path}")));
    }

    let (listing, truncated) = truncate_output(stdout.as_bytes(), max_output_size);

    let entries = listing
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, ' ');
            let kind = fields.next()?;
            let size_bytes: u64 = fields.next()?.parse().ok()?;
            let name = fields.next()?.to_string();
            Some(ListEntry {
                name,
                is_dir: kind == "d",
                size_bytes,
            })
        })
        .collect();

    Ok(ListResult { path, entries, truncated })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entry_round_trips_through_json() {
        let entry = ListEntry {
            name: "file.txt".to_string(),
            is_dir: false,
            size_bytes: 42,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: ListEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "file.txt");
        assert_eq!(back.size_bytes, 42);
    }
}
