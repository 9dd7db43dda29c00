//! Dialing a single SSH session: auth method selection, algorithm
//! preferences, and host-key verification.

use async_ssh2_tokio::client::{AuthMethod, Client};
use async_ssh2_tokio::{Config as SshClientConfig, ServerCheckMethod};
use log::debug;

use crate::config::{Config, KnownHosts, SSHHost};
use crate::error::{ConnectCause, ScoutError};

/// Opens a new SSH session to `host`, honoring the localhost redirect,
/// identity-file-or-agent auth selection, and strict/non-strict host-key
/// verification from `config`.
pub async fn dial(host: &SSHHost, config: &Config) -> Result<Client, ScoutError> {
    let (addr, port) = host.dial_target();
    debug!("dialing {}@{addr}:{port} (alias {})", host.user, host.name);

    let auth = match host.identity_file.as_ref() {
        Some(path) => AuthMethod::with_key_file(path.to_string_lossy().into_owned(), None),
        None => AuthMethod::with_agent(),
    };

    let server_check = server_check_method(config);

    let ssh_config = SshClientConfig {
        inactivity_timeout: Some(config.idle_timeout),
        ..Default::default()
    };

    let connect = Client::connect_with_config((addr.clone(), port), &host.user, auth, server_check, ssh_config);

    match tokio::time::timeout(config.ssh_connect_timeout, connect).await {
        Ok(Ok(client)) => Ok(client),
        Ok(Err(source)) => Err(ScoutError::Connect {
            host: host.name.clone(),
            source: ConnectCause::from(source),
        }),
        Err(_) => Err(ScoutError::Connect {
            host: host.name.clone(),
            source: ConnectCause::DialTimeout,
        }),
    }
}

/// Resolves the host-key verification strategy. `ConnectionPool::new`
/// already verified at construction time that a configured `known_hosts`
/// path exists (spec.md §4.3's fail-closed check is unconditional, not
/// gated on `strict_host_key_checking`), so this only picks between the
/// two already-valid strategies.
fn server_check_method(config: &Config) -> ServerCheckMethod {
    match &config.known_hosts_path {
        KnownHosts::Disabled => ServerCheckMethod::NoCheck,
        KnownHosts::Path(path) => ServerCheckMethod::KnownHostsFile(path.to_string_lossy().into_owned()),
    }
}
