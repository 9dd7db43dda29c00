//! Request timing: warns when a request exceeds `slow_threshold_ms`.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::warn;

use crate::context::AppContext;

pub async fn timing_middleware(State(ctx): State<Arc<AppContext>>, request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if elapsed_ms > ctx.config.slow_threshold_ms {
        warn!("slow request: {path} took {elapsed_ms}ms (threshold {}ms)", ctx.config.slow_threshold_ms);
    }

    response
}
