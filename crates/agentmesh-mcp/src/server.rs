// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`AgentMeshServer`] — the rmcp [`ServerHandler`] implementation.
//!
//! This struct wraps a [`ToolRegistry`] and implements the MCP `tools/list`
//! and `tools/call` protocol methods. All other MCP lifecycle methods
//! (initialize, shutdown, ping) are handled by the default rmcp
//! implementations.
//!
//! The server carries no per-connection session state of its own: every
//! `call_tool` request is forwarded straight to the registry, which holds
//! the shared [`agentmesh_core::Engine`] and talks to the store directly.
//! Multiple agents can share one server process because all coordination
//! state lives in the store, not in this struct.

use std::sync::Arc;

use agentmesh_tools::{ToolCall, ToolRegistry};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use tracing::debug;
use uuid::Uuid;

use crate::bridge::{output_to_call_result, schema_to_mcp_tool};

/// Every tool call gets a fresh id, scoped to this process only — it is
/// never persisted or round-tripped back to the caller, so a `Uuid` is
/// just a convenient source of uniqueness, not a coordination-protocol id.
fn new_call_id() -> String {
    Uuid::new_v4().to_string()
}

/// MCP server — wraps a [`ToolRegistry`] and speaks the MCP protocol.
///
/// Create with [`AgentMeshServer::new`] and then call
/// [`rmcp::ServiceExt::serve`] to start serving on a transport.
#[derive(Clone)]
pub struct AgentMeshServer {
    registry: Arc<ToolRegistry>,
}

impl AgentMeshServer {
    /// Create a new server backed by the given [`ToolRegistry`].
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

impl ServerHandler for AgentMeshServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let registry = self.registry.clone();
        async move {
            let tools = registry
                .schemas()
                .into_iter()
                .map(schema_to_mcp_tool)
                .collect();
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(|m| serde_json::Value::Object(m.into_iter().collect()))
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        // `project_id` is present on almost every coordination tool's args
        // but not part of the MCP request shape itself, so it's pulled out
        // here purely for the trace — the registry re-reads it from `args`.
        let project_id = args.get("project_id").and_then(|v| v.as_str()).unwrap_or("-");
        debug!(tool = %request.name, project_id, "dispatching tool call");

        let call = ToolCall {
            id: new_call_id(),
            name: request.name.to_string(),
            args,
        };

        let output = self.registry.execute(&call).await;
        Ok(output_to_call_result(output))
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
//
// These tests cover the parts of AgentMeshServer that can be tested without
// an active transport or RequestContext. The full list_tools / call_tool
// round-trips are covered by the integration tests in tests/integration.rs.
