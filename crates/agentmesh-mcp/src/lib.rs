// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `agentmesh-mcp` — MCP (Model Context Protocol) server for the
//! agent-coordination engine.
//!
//! Exposes the engine's tool surface to any MCP-compatible host (Cursor,
//! Claude Desktop, opencode, codex, etc.) over **stdio** transport using
//! line-delimited JSON-RPC. Every coding agent working on a shared project
//! connects to the same server instance and coordinates through it.
//!
//! # Quick start
//!
//! ```text
//! agentmesh serve
//! ```
//!
//! # MCP client configuration
//!
//! ## Cursor / Claude Desktop (`mcp.json`)
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "agentmesh": {
//!       "command": "agentmesh",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Custom tool subset
//!
//! ```text
//! agentmesh serve --tools register_agent,heartbeat,send_message
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP client (Cursor, Claude Desktop, …)
//!       │  stdin/stdout (line-delimited JSON-RPC)
//!       ▼
//! AgentMeshServer (rmcp ServerHandler)
//!       │
//!       ▼
//! ToolRegistry  ──►  Tool::execute()  ──►  Engine  ──►  StoreBackend
//! ```

pub mod bridge;
pub mod registry;
pub mod server;

pub use registry::{build_mcp_registry, DEFAULT_TOOL_NAMES};
pub use server::AgentMeshServer;

use std::sync::Arc;

use agentmesh_tools::ToolRegistry;
use anyhow::Result;
use rmcp::ServiceExt;

/// Start an MCP stdio server, serving the tools in `registry` on
/// `stdin` / `stdout`.
///
/// This function blocks until the client disconnects (stdin EOF) or the
/// process is terminated. It is designed to be called as the sole operation
/// of the `agentmesh serve` subcommand.
///
/// # Errors
///
/// Returns an error if the rmcp transport fails to initialize or if the
/// server encounters a fatal I/O error.
pub async fn serve_stdio(registry: Arc<ToolRegistry>) -> Result<()> {
    let server = AgentMeshServer::new(registry);
    let running = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .map_err(|e| anyhow::anyhow!("MCP server init error: {e}"))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
    Ok(())
}
