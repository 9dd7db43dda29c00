//! SSH host catalog: derived from `~/.ssh/config`, classified by the hostname detector.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ssh2_config::{ParseRule, SshConfig};

use crate::error::ScoutError;

/// One catalog entry, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SSHHost {
    pub name: String,
    pub hostname: String,
    pub user: String,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    pub is_localhost: bool,
}

impl SSHHost {
    /// The address the pool should actually dial, honoring the localhost override.
    pub fn dial_target(&self) -> (String, u16) {
        if self.is_localhost {
            ("127.0.0.1".to_string(), 22)
        } else {
            (self.hostname.clone(), self.port)
        }
    }
}

/// Ordered map of catalog entries, keyed by alias. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct HostCatalog {
    hosts: BTreeMap<String, SSHHost>,
}

impl HostCatalog {
    /// Parses `path` (an OpenSSH-config-style file) and classifies every alias.
    ///
    /// `Host *` wildcard stanzas are skipped: this crate resolves concrete
    /// aliases by re-querying the parsed config per alias name, so a bare
    /// wildcard line (which names no alias) is never visited.
    pub fn load(path: &Path) -> Result<Self, ScoutError> {
        let aliases = read_host_aliases(path)?;

        let mut reader = BufReader::new(File::open(path).map_err(|e| {
            ScoutError::Config(format!("could not open ssh config {}: {e}", path.display()))
        })?);
        let parsed = SshConfig::default()
            .parse(&mut reader, ParseRule::STRICT)
            .map_err(|e| ScoutError::Config(format!("could not parse ssh config: {e}")))?;

        let local_name = local_hostname();
        let mut hosts = BTreeMap::new();
        for alias in aliases {
            let params = parsed.query(&alias);
            let hostname = params.host_name.clone().unwrap_or_else(|| alias.clone());
            let user = params.user.clone().unwrap_or_else(|| "root".to_string());
            let port = params.port.unwrap_or(22);
            let identity_file = params
                .identity_file
                .as_ref()
                .and_then(|files| files.first().cloned());
            let is_localhost = is_localhost_match(&local_name, &alias)
                || is_localhost_match(&local_name, &hostname);

            hosts.insert(
                alias.clone(),
                SSHHost {
                    name: alias,
                    hostname,
                    user,
                    port,
                    identity_file,
                    is_localhost,
                },
            );
        }

        Ok(Self { hosts })
    }

    /// Builds a catalog directly from already-resolved entries, bypassing
    /// file parsing. Used by tests and by embedders with their own host
    /// discovery mechanism.
    pub fn from_hosts(hosts: BTreeMap<String, SSHHost>) -> Self {
        Self { hosts }
    }

    /// All catalog entries, in file order.
    pub fn get_hosts(&self) -> &BTreeMap<String, SSHHost> {
        &self.hosts
    }

    pub fn get_host(&self, name: &str) -> Option<&SSHHost> {
        self.hosts.get(name)
    }
}

/// Scans the raw config file for `Host <alias>` directives, skipping any
/// stanza whose pattern list contains a wildcard or is otherwise unusable
/// as a concrete catalog key.
fn read_host_aliases(path: &Path) -> Result<Vec<String>, ScoutError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScoutError::Config(format!("could not read ssh config {}: {e}", path.display()))
    })?;

    let mut aliases = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed
            .strip_prefix("Host ")
            .or_else(|| trimmed.strip_prefix("host "))
        else {
            continue;
        };
        for alias in rest.split_whitespace() {
            if alias.contains('*') || alias.contains('?') {
                continue;
            }
            aliases.push(alias.to_string());
        }
    }
    Ok(aliases)
}

/// Lowercased local machine hostname, used for the localhost-override match.
fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// True when `a` and `b` are the same host by prefix-equal FQDN match:
/// `code-server` matches `code-server.example.com` and vice versa.
fn is_localhost_match(local: &str, candidate: &str) -> bool {
    if local.is_empty() || candidate.is_empty() {
        return false;
    }
    let candidate = candidate.to_ascii_lowercase();
    let local_short = local.split('.').next().unwrap_or(local);
    let candidate_short = candidate.split('.').next().unwrap_or(&candidate);
    local == candidate || local_short == candidate || local == candidate_short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_match_is_prefix_fqdn_equality() {
        assert!(is_localhost_match("code-server", "code-server.example.com"));
        assert!(is_localhost_match("code-server.example.com", "code-server"));
        assert!(is_localhost_match("box1", "box1"));
        assert!(!is_localhost_match("box1", "box2"));
    }

    #[test]
    fn localhost_match_ignores_empty_names() {
        assert!(!is_localhost_match("", "box1"));
        assert!(!is_localhost_match("box1", ""));
    }

    #[test]
    fn dial_target_overrides_to_loopback_for_localhost() {
        let host = SSHHost {
            name: "dev".to_string(),
            hostname: "dev.example.com".to_string(),
            user: "root".to_string(),
            port: 2222,
            identity_file: None,
            is_localhost: true,
        };
        assert_eq!(host.dial_target(), ("127.0.0.1".to_string(), 22));
    }

    #[test]
    fn wildcard_host_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            "Host *\n  StrictHostKeyChecking no\n\nHost web1\n  HostName 10.0.0.1\n  User deploy\n",
        )
        .unwrap();
        let aliases = read_host_aliases(&path).unwrap();
        assert_eq!(aliases, vec!["web1".to_string()]);
    }
}
