//! # scout - remote-operations gateway
//!
//! `scout` pools SSH connections to a fleet of hosts (derived from
//! `~/.ssh/config`) and exposes a small set of high-level file and command
//! operations — stat, read, list, tree, run, find, diff, beam, broadcast —
//! behind an auth/rate-limit/logging middleware stack, over either an HTTP
//! or stdio transport.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scout::context::AppContext;
//! use scout::transport::{self, TransportMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = std::sync::Arc::new(AppContext::bootstrap()?);
//!     transport::run(ctx, TransportMode::from_env()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Main Components
//!
//! - [`pool::ConnectionPool`] - per-host-locked, LRU-bounded pool of live SSH sessions
//! - [`executors`] - stat/read/list/tree/run/find/diff/beam operation contracts
//! - [`broadcast::broadcast`] - fans a command out across every cataloged host
//! - [`middleware`] - Auth → RateLimit → Error → Timing → Logging request pipeline
//! - [`config`] - env-overridable tunables plus the SSH host catalog
//! - [`context::AppContext`] - the composition root tying the above together

pub mod adapters;
pub mod broadcast;
pub mod config;
pub mod context;
pub mod error;
pub mod executors;
pub mod middleware;
pub mod pool;
pub mod target;
pub mod transport;
pub mod validation;
