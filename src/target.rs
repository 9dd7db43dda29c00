//! Target grammar: `"hosts"` | `"<host>"` | `"<host>:<path>"`.

use serde::{Deserialize, Serialize};

use crate::error::ScoutError;
use crate::validation::{validate_host, validate_path};

/// A parsed target string, ready for dispatch to the pool/executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ScoutTarget {
    /// The literal `"hosts"` target: list the catalog instead of touching the network.
    Hosts,
    /// `"<host>"` with no path component.
    Host { host: String },
    /// `"<host>:<path>"`.
    HostPath { host: String, path: String },
}

impl ScoutTarget {
    /// Parses and validates `raw` against the target grammar.
    ///
    /// A colon splits host from path on the *first* occurrence, so paths may
    /// themselves contain colons (e.g. `web1:/srv/data:backup/file`).
    pub fn parse(raw: &str) -> Result<Self, ScoutError> {
        if raw == "hosts" {
            return Ok(ScoutTarget::Hosts);
        }

        match raw.split_once(':') {
            None => {
                validate_host(raw)?;
                Ok(ScoutTarget::Host {
                    host: raw.to_string(),
                })
            }
            Some((host, path)) => {
                validate_host(host)?;
                let path = validate_path(path)?;
                Ok(ScoutTarget::HostPath {
                    host: host.to_string(),
                    path,
                })
            }
        }
    }

    pub fn host(&self) -> Option<&str> {
        match self {
            ScoutTarget::Hosts => None,
            ScoutTarget::Host { host } => Some(host),
            ScoutTarget::HostPath { host, .. } => Some(host),
        }
    }
}
