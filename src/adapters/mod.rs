//! Tool/resource adapters: target-parsing plus executor dispatch, exposed as
//! plain async functions with schema-carrying request/response types.
//!
//! This module deliberately stops short of MCP JSON-RPC/SSE framing and
//! capability negotiation — those mechanics belong to a transport layer
//! that calls into `dispatch_tool`/`list_resources`, not to this crate.

pub mod resources;
pub mod tools;

pub use resources::{list_resources, HostLiveness};
pub use tools::{dispatch_tool, ToolRequest, ToolResponse};
