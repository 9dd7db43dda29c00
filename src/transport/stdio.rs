//! Stdio transport: one newline-delimited JSON [`ToolRequest`] per line on
//! stdin, one newline-delimited JSON response per line on stdout.
//!
//! This exists to exercise the dispatch pipeline end to end without an
//! external MCP SDK; it is not itself an MCP transport.

use std::sync::Arc;

use log::{error, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::adapters::{dispatch_tool, ToolRequest};
use crate::context::AppContext;

pub async fn serve_stdio(ctx: Arc<AppContext>) -> Result<(), crate::error::ScoutError> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolRequest>(&line) {
            Ok(request) => match dispatch_tool(&ctx, request).await {
                Ok(result) => serde_json::to_value(result).unwrap_or_default(),
                Err(e) => {
                    warn!("tool call failed: {e}");
                    serde_json::json!({ "error": e.to_string() })
                }
            },
            Err(e) => {
                error!("malformed request line, skipping: {e}");
                serde_json::json!({ "error": format!("malformed request: {e}") })
            }
        };

        let mut payload = serde_json::to_vec(&response).unwrap_or_default();
        payload.push(b'\n');
        stdout.write_all(&payload).await?;
        stdout.flush().await?;
    }

    Ok(())
}
