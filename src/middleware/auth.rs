//! API-key authentication: an `X-API-Key` header checked in constant time
//! against the configured key set.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::context::AppContext;

use super::is_health_check;

const API_KEY_HEADER: &str = "x-api-key";

pub async fn auth_middleware(
    State(ctx): State<Arc<AppContext>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_health_check(request.uri().path()) || ctx.config.api_keys.is_empty() {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if ctx.config.api_keys.iter().any(|key| constant_time_eq(key, presented)) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, "authentication failed").into_response()
    }
}

/// Compares `a` and `b` in time independent of where they first differ.
/// Length is compared (and short-circuits) up front — hiding a key's
/// length is not a goal here, only hiding *which byte* failed to match.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_matches_equal_strings() {
        assert!(constant_time_eq("secret-key", "secret-key"));
    }

    #[test]
    fn constant_time_eq_rejects_mismatches_and_length_differences() {
        assert!(!constant_time_eq("secret-key", "secret-kex"));
        assert!(!constant_time_eq("secret-key", "secret-ke"));
        assert!(!constant_time_eq("", "x"));
    }
}
