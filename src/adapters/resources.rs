//! Resource adapter: the `hosts` target's parallel-reachability view.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;

use crate::context::AppContext;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HostLiveness {
    pub name: String,
    pub hostname: String,
    pub port: u16,
    pub reachable: bool,
}

/// Probes every catalog entry concurrently with a short TCP-connect check
/// and returns a liveness view. This never touches the connection pool: a
/// host can be "reachable" at the TCP level while still failing SSH auth,
/// and callers asking `hosts` generally want the cheaper, faster signal.
pub async fn list_resources(ctx: &AppContext) -> Vec<HostLiveness> {
    let hosts: Vec<_> = ctx.pool.catalog().get_hosts().values().cloned().collect();

    let probes = hosts.into_iter().map(|host| async move {
        let (addr, port) = host.dial_target();
        let reachable = tokio::time::timeout(Duration::from_secs(2), TcpStream::connect((addr.as_str(), port)))
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false);
        HostLiveness {
            name: host.name,
            hostname: host.hostname,
            port,
            reachable,
        }
    });

    futures::future::join_all(probes).await
}
