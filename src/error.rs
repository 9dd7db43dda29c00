//! Error taxonomy for the connection pool, executors, middleware, and config layers.
//!
//! Every fallible path in this crate returns a variant of [`ScoutError`]. The
//! variants mirror the design-level error kinds from the gateway's
//! specification: validation, auth, rate-limit, config, connect, exec,
//! timeout, transfer, and output-too-large.

use thiserror::Error;

/// Errors that can occur anywhere in the Scout gateway.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// A path or host name was rejected by the validation layer.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller's API key was missing or did not match any configured key.
    #[error("authentication failed")]
    Auth,

    /// The caller's token bucket is empty; retry after the given duration.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit { retry_after_secs: u64 },

    /// A fatal misconfiguration detected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The SSH dial failed, the host key did not match, or the network was unreachable.
    #[error("connect error for host '{host}': {source}")]
    Connect {
        host: String,
        #[source]
        source: ConnectCause,
    },

    /// A remote command could not be completed for reasons other than a non-zero exit code.
    #[error("command execution failed: {0}")]
    Exec(String),

    /// A remote or client-side operation exceeded its timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// An SFTP upload or download failed.
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// Remote output exceeded `max_output_size` and was truncated.
    ///
    /// Not normally propagated as an error — executors catch this internally
    /// and return a truncated payload instead (see `executors::truncate_output`).
    /// Kept as a variant so internal plumbing has a typed signal to react to.
    #[error("output exceeded {limit} bytes")]
    OutputTooLarge { limit: u64 },

    /// The target string did not match the `hosts` | `<host>` | `<host>:<path>` grammar.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Lookup of an unknown host name in the catalog.
    #[error("unknown host '{0}'")]
    UnknownHost(String),

    /// Wraps any uncaught I/O error surfaced by the underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Causes that can underlie a [`ScoutError::Connect`].
#[derive(Error, Debug)]
pub enum ConnectCause {
    #[error("dial timed out")]
    DialTimeout,

    #[error("host key verification failed")]
    HostKeyMismatch,

    #[error(transparent)]
    Russh(#[from] russh::Error),

    #[error(transparent)]
    Ssh2(#[from] async_ssh2_tokio::Error),

    #[error("{0}")]
    Other(String),
}

impl ScoutError {
    /// True for errors the retry wrapper should treat as worth a single reconnect-and-retry.
    pub fn is_retryable_connect_error(&self) -> bool {
        matches!(self, ScoutError::Connect { .. } | ScoutError::Io(_))
    }
}
