//! Transport selection: HTTP (default) or newline-delimited-JSON stdio,
//! chosen by the `SCOUT_TRANSPORT` env var (`http` | `stdio`).

pub mod http;
pub mod stdio;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::ScoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Http,
    Stdio,
}

impl TransportMode {
    pub fn from_env() -> Self {
        match std::env::var("SCOUT_TRANSPORT")
            .or_else(|_| std::env::var("MCP_CAT_TRANSPORT"))
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "stdio" => TransportMode::Stdio,
            _ => TransportMode::Http,
        }
    }
}

pub async fn run(ctx: Arc<AppContext>, mode: TransportMode) -> Result<(), ScoutError> {
    match mode {
        TransportMode::Http => {
            let bind = http_bind_addr();
            http::serve_http(ctx, bind).await
        }
        TransportMode::Stdio => stdio::serve_stdio(ctx).await,
    }
}

/// Resolves the HTTP bind address from `SCOUT_HTTP_HOST`/`SCOUT_HTTP_PORT`
/// (legacy `MCP_CAT_HTTP_HOST`/`MCP_CAT_HTTP_PORT` fallback), per spec.md §6.
/// Only the host's *default* diverges from spec.md (`127.0.0.1` instead of
/// the spec's `0.0.0.0`, see `http::DEFAULT_HOST`); the port default and the
/// var names themselves match the spec exactly.
fn http_bind_addr() -> SocketAddr {
    let host = std::env::var("SCOUT_HTTP_HOST")
        .or_else(|_| std::env::var("MCP_CAT_HTTP_HOST"))
        .unwrap_or_else(|_| http::DEFAULT_HOST.to_string());
    let port: u16 = std::env::var("SCOUT_HTTP_PORT")
        .or_else(|_| std::env::var("MCP_CAT_HTTP_PORT"))
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(http::DEFAULT_PORT);

    format!("{host}:{port}")
        .parse()
        .unwrap_or_else(|_| SocketAddr::from((std::net::Ipv4Addr::LOCALHOST, http::DEFAULT_PORT)))
}
