//! Tool dispatch: parses a target, resolves the connection(s) it names, and
//! routes to the matching executor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::resources::{list_resources, HostLiveness};
use crate::broadcast::{broadcast, broadcast_all_hosts, BroadcastResult};
use crate::context::AppContext;
use crate::error::ScoutError;
use crate::executors::{
    beam::{beam, DirectionRequest},
    diff_files, find_files, list_dir, read_file, run_command, stat_path, tree_dir, CommandResult, DiffResult,
    FindResult, ListResult, ReadResult, StatResult, TransferResult, TreeResult, DEFAULT_DIFF_CTX,
};
use crate::target::ScoutTarget;

/// A single tool invocation: which operation, which target, and any
/// operation-specific parameters carried as a loosely-typed JSON blob (the
/// precise shape is operation-dependent and validated per-operation below).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolRequest {
    pub operation: String,
    pub target: String,
    #[serde(default)]
    pub params: Value,
    /// A second target, for operations that compare data across two hosts
    /// (`diff`). Ignored by single-target operations, including `beam`,
    /// whose second endpoint is always the local filesystem (`params.local_path`).
    #[serde(default)]
    pub target2: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolResponse {
    Stat(StatResult),
    Read(ReadResult),
    List(ListResult),
    Tree(TreeResult),
    Run(CommandResult),
    Find(FindResult),
    Diff(DiffResult),
    Beam(TransferResult),
    Broadcast(BroadcastResult),
    /// The `hosts` target sentinel: every catalog entry plus a parallel
    /// TCP-reachability probe (spec.md §8 S1 — offline hosts show `[✗]`,
    /// left to callers rendering this as text; this carries the raw bool).
    Hosts(Vec<HostLiveness>),
}

/// Dispatches `request` against `ctx`, acquiring whatever pooled connections
/// the target operation needs.
pub async fn dispatch_tool(ctx: &AppContext, request: ToolRequest) -> Result<ToolResponse, ScoutError> {
    let target = ScoutTarget::parse(&request.target)?;

    if matches!(target, ScoutTarget::Hosts) {
        return Ok(ToolResponse::Hosts(list_resources(ctx).await));
    }

    match request.operation.as_str() {
        "stat" => {
            let (conn, path) = resolve_host_path(ctx, &target).await?;
            Ok(ToolResponse::Stat(stat_path(&conn, &path).await?))
        }
        "read" => {
            let (conn, path) = resolve_host_path(ctx, &target).await?;
            Ok(ToolResponse::Read(read_file(&conn, &path, ctx.config.max_file_size).await?))
        }
        "list" => {
            let (conn, path) = resolve_host_path(ctx, &target).await?;
            Ok(ToolResponse::List(list_dir(&conn, &path, ctx.config.max_output_size).await?))
        }
        "tree" => {
            let (conn, path) = resolve_host_path(ctx, &target).await?;
            let max_depth = param_u32(&request.params, "max_depth", 3);
            Ok(ToolResponse::Tree(
                tree_dir(&conn, &path, max_depth, ctx.config.max_output_size).await?,
            ))
        }
        "run" => {
            let host = target
                .host()
                .ok_or_else(|| ScoutError::InvalidTarget("run requires a host".to_string()))?;
            let command = param_str(&request.params, "command")?;
            let conn = ctx.pool.acquire_with_retry(host).await?;
            Ok(ToolResponse::Run(
                run_command(&conn, &command, ctx.config.command_timeout, ctx.config.max_output_size).await?,
            ))
        }
        "find" => {
            let (conn, path) = resolve_host_path(ctx, &target).await?;
            let pattern = param_str(&request.params, "pattern")?;
            let max_depth = param_u32(&request.params, "max_depth", 10);
            Ok(ToolResponse::Find(
                find_files(&conn, &path, &pattern, max_depth, ctx.config.max_output_size).await?,
            ))
        }
        "diff" => {
            let second = request
                .target2
                .as_deref()
                .ok_or_else(|| ScoutError::InvalidTarget("diff requires target2".to_string()))?;
            let right_target = ScoutTarget::parse(second)?;
            let (left_conn, left_path) = resolve_host_path(ctx, &target).await?;
            let (right_conn, right_path) = resolve_host_path(ctx, &right_target).await?;
            let diff_ctx = param_u32(&request.params, "ctx", DEFAULT_DIFF_CTX as u32) as usize;
            Ok(ToolResponse::Diff(
                diff_files(&left_conn, &left_path, &right_conn, &right_path, ctx.config.max_file_size, diff_ctx)
                    .await?,
            ))
        }
        "beam" => {
            let (conn, remote_path) = resolve_host_path(ctx, &target).await?;
            let local_path = param_str(&request.params, "local_path")?;
            let direction = DirectionRequest::parse(
                request
                    .params
                    .get("direction")
                    .and_then(Value::as_str)
                    .unwrap_or("auto"),
            )?;
            Ok(ToolResponse::Beam(beam(&conn, &local_path, &remote_path, direction).await?))
        }
        "broadcast" => {
            let command = param_str(&request.params, "command")?;
            let result = match request.params.get("targets").and_then(Value::as_array) {
                Some(targets) => {
                    let targets: Vec<String> = targets
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect();
                    broadcast(
                        &ctx.pool,
                        &targets,
                        &command,
                        ctx.config.command_timeout,
                        ctx.config.max_output_size,
                    )
                    .await
                }
                None => {
                    broadcast_all_hosts(&ctx.pool, &command, ctx.config.command_timeout, ctx.config.max_output_size)
                        .await
                }
            };
            Ok(ToolResponse::Broadcast(result))
        }
        other => Err(ScoutError::Validation(format!("unknown operation '{other}'"))),
    }
}

async fn resolve_host_path(
    ctx: &AppContext,
    target: &ScoutTarget,
) -> Result<(std::sync::Arc<crate::pool::PooledConnection>, String), ScoutError> {
    match target {
        ScoutTarget::Hosts => Err(ScoutError::InvalidTarget(
            "this operation requires a host[:path] target, not 'hosts'".to_string(),
        )),
        ScoutTarget::Host { host } => Ok((ctx.pool.acquire_with_retry(host).await?, String::new())),
        ScoutTarget::HostPath { host, path } => Ok((ctx.pool.acquire_with_retry(host).await?, path.clone())),
    }
}

fn param_str(params: &Value, key: &str) -> Result<String, ScoutError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ScoutError::Validation(format!("missing required parameter '{key}'")))
}

fn param_u32(params: &Value, key: &str, default: u32) -> u32 {
    params.get(key).and_then(Value::as_u64).map(|v| v as u32).unwrap_or(default)
}
