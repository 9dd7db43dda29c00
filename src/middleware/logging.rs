//! One-line-per-request access logging, with optional payload logging for
//! debugging (off by default — request/response bodies can carry secrets).

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use uuid::Uuid;

use crate::context::AppContext;

pub async fn logging_middleware(State(ctx): State<Arc<AppContext>>, request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let body_preview = if ctx.config.log_payloads {
        Some(format!("{:?}", request.headers()))
    } else {
        None
    };

    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status().as_u16();

    match body_preview {
        Some(headers) => info!("[{request_id}] {method} {path} -> {status} ({elapsed_ms}ms) headers={headers}"),
        None => info!("[{request_id}] {method} {path} -> {status} ({elapsed_ms}ms)"),
    }

    response
}
