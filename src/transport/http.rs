//! HTTP transport: `axum` router wrapping the adapters behind the
//! Auth → RateLimit → Error → Timing → Logging middleware chain.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{middleware, Router};
use log::info;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::{dispatch_tool, list_resources, ToolRequest};
use crate::context::AppContext;
use crate::middleware::{auth_middleware, error_middleware, logging_middleware, rate_limit_middleware, timing_middleware};

/// Default bind host: loopback only. spec.md §6 names `0.0.0.0` as the
/// default and separately flags that default as a known footgun (§9 Open
/// Questions) for a gateway that holds live SSH sessions; operators who want
/// the spec's wide-open default must opt in via `SCOUT_HTTP_HOST=0.0.0.0`.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port, matching spec.md §6 exactly.
pub const DEFAULT_PORT: u16 = 8000;

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tools/{name}", post(tool_handler))
        .route("/resources/{*path}", get(resources_handler))
        // Added innermost-first: the layer added last wraps every layer
        // added before it, so this produces CatchPanic (outermost) → Auth →
        // RateLimit → Error → Timing → Logging → Trace (innermost, closest
        // to the handler).
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(ctx.clone(), logging_middleware))
        .layer(middleware::from_fn_with_state(ctx.clone(), timing_middleware))
        .layer(middleware::from_fn(error_middleware))
        .layer(middleware::from_fn_with_state(ctx.clone(), rate_limit_middleware))
        .layer(middleware::from_fn_with_state(ctx.clone(), auth_middleware))
        .layer(CatchPanicLayer::new())
        .with_state(ctx)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn tool_handler(
    State(ctx): State<Arc<AppContext>>,
    Path(name): Path<String>,
    Json(mut body): Json<ToolRequest>,
) -> impl IntoResponse {
    body.operation = name;
    match dispatch_tool(&ctx, body).await {
        Ok(response) => (StatusCode::OK, Json(serde_json::to_value(response).unwrap_or_default())).into_response(),
        Err(e) => (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

async fn resources_handler(State(ctx): State<Arc<AppContext>>, Path(_path): Path<String>) -> impl IntoResponse {
    Json(list_resources(&ctx).await)
}

fn status_for(err: &crate::error::ScoutError) -> StatusCode {
    use crate::error::ScoutError::*;
    match err {
        Auth => StatusCode::UNAUTHORIZED,
        RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
        Validation(_) | InvalidTarget(_) => StatusCode::BAD_REQUEST,
        UnknownHost(_) => StatusCode::NOT_FOUND,
        Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Connect { .. } | Exec(_) | Transfer(_) | Io(_) | OutputTooLarge { .. } => StatusCode::BAD_GATEWAY,
        Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Runs the HTTP transport to completion (until ctrl-c).
pub async fn serve_http(ctx: Arc<AppContext>, bind: SocketAddr) -> Result<(), crate::error::ScoutError> {
    let app = build_router(ctx);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("scout listening on http://{bind}");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
