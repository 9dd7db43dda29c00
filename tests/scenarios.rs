//! End-to-end scenarios that exercise dispatch without touching the
//! network: target parsing, unknown-host/unknown-operation rejection, and
//! the `hosts` sentinel short-circuit.

use std::collections::BTreeMap;

use scout::adapters::{dispatch_tool, ToolRequest, ToolResponse};
use scout::config::{Config, HostCatalog, KnownHosts};
use scout::context::AppContext;
use scout::error::ScoutError;

fn empty_catalog_context() -> AppContext {
    let config = Config {
        max_file_size: 1024 * 1024,
        command_timeout: std::time::Duration::from_secs(5),
        idle_timeout: std::time::Duration::from_secs(60),
        max_pool_size: 10,
        ssh_connect_timeout: std::time::Duration::from_secs(5),
        known_hosts_path: KnownHosts::Disabled,
        strict_host_key_checking: false,
        api_keys: Vec::new(),
        rate_limit_per_minute: 60,
        rate_limit_burst: 10,
        max_output_size: 1024 * 1024,
        log_payloads: false,
        slow_threshold_ms: 1000,
        ssh_config_path: std::path::PathBuf::new(),
    };
    AppContext::new(config, HostCatalog::from_hosts(BTreeMap::new()))
        .expect("disabled known_hosts never fails construction")
}

#[tokio::test]
async fn s1_hosts_target_short_circuits_to_catalog_listing() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "list".to_string(), // operation is irrelevant for the "hosts" sentinel
        target: "hosts".to_string(),
        params: serde_json::Value::Null,
        target2: None,
    };

    let response = dispatch_tool(&ctx, request).await.expect("hosts dispatch should succeed");
    match response {
        ToolResponse::Hosts(hosts) => assert!(hosts.is_empty()),
        other => panic!("expected ToolResponse::Hosts, got {other:?}"),
    }
}

#[tokio::test]
async fn s2_run_on_unknown_host_is_unknown_host_error() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "run".to_string(),
        target: "web1".to_string(),
        params: serde_json::json!({ "command": "uptime" }),
        target2: None,
    };

    let err = dispatch_tool(&ctx, request).await.expect_err("web1 is not cataloged");
    assert!(matches!(err, ScoutError::UnknownHost(_)));
}

#[tokio::test]
async fn s3_unknown_operation_is_rejected_before_any_connect_attempt() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "teleport".to_string(),
        target: "web1".to_string(),
        params: serde_json::Value::Null,
        target2: None,
    };

    let err = dispatch_tool(&ctx, request).await.expect_err("unknown operation");
    assert!(matches!(err, ScoutError::Validation(_)));
}

#[tokio::test]
async fn s4_run_without_command_param_is_validation_error() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "run".to_string(),
        target: "web1".to_string(),
        params: serde_json::Value::Null,
        target2: None,
    };

    let err = dispatch_tool(&ctx, request).await.expect_err("missing command param");
    assert!(matches!(err, ScoutError::Validation(_)));
}

#[tokio::test]
async fn s5_diff_requires_a_second_target() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "diff".to_string(),
        target: "web1:/etc/hosts".to_string(),
        params: serde_json::Value::Null,
        target2: None,
    };

    let err = dispatch_tool(&ctx, request).await.expect_err("diff needs target2");
    assert!(matches!(err, ScoutError::InvalidTarget(_)));
}

#[tokio::test]
async fn s6_path_traversal_in_target_is_rejected_during_parse() {
    let ctx = empty_catalog_context();
    let request = ToolRequest {
        operation: "read".to_string(),
        target: "web1:/var/../etc/shadow".to_string(),
        params: serde_json::Value::Null,
        target2: None,
    };

    let err = dispatch_tool(&ctx, request).await.expect_err("traversal should be rejected");
    assert!(matches!(err, ScoutError::Validation(_)));
}
