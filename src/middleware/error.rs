//! Catch-all error middleware: normalizes every client/server error response
//! produced downstream into the crate's structured JSON error envelope.
//!
//! This does not catch panics (that is `tower_http::catch_panic::CatchPanicLayer`'s
//! job, layered outermost in `transport::http::build_router`); it normalizes
//! the *shape* of error responses so every failure mode looks the same to a caller.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub async fn error_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let message = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();

    (status, axum::Json(json!({ "error": message, "status": status.as_u16() }))).into_response()
}
