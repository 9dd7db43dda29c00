//! Middleware stack, applied outermost-to-innermost in the fixed order
//! Auth → RateLimit → Error → Timing → Logging around every handler.

pub mod auth;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod timing;

pub use auth::auth_middleware;
pub use error::error_middleware;
pub use logging::logging_middleware;
pub use rate_limit::rate_limit_middleware;
pub use timing::timing_middleware;

/// Paths that skip Auth and RateLimit entirely, per spec: health checks
/// must work even when a caller has no API key or has exhausted its bucket.
pub fn is_health_check(path: &str) -> bool {
    path == "/health"
}
