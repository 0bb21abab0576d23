// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! MCP-facing registry construction for the coordination server.
//!
//! Every tool in [`agentmesh_tools`] is safe to expose over MCP — unlike a
//! coding-agent tool surface there is no filesystem or shell access here, so
//! (unlike that domain) nothing needs to be withheld by default. The
//! `--tools` CLI flag still lets an operator restrict a server instance to a
//! subset, e.g. to stand up a read-only observer.

use std::collections::HashSet;
use std::sync::Arc;

use agentmesh_core::Engine;
use agentmesh_tools::{build_registry, ToolRegistry};

/// Every tool name the coordination engine registers, sorted.
///
/// Kept in sync with [`agentmesh_tools::tools::build_registry`] by the test
/// below; clients can use this list to discover the default MCP surface
/// without starting a server.
pub const DEFAULT_TOOL_NAMES: &[&str] = &[
    "add_todo",
    "announce_file_change",
    "broadcast_message",
    "check_file_conflicts",
    "check_messages",
    "get_active_agents",
    "get_all_todos",
    "get_messages",
    "get_my_todos",
    "get_recent_changes",
    "get_todo_list",
    "heartbeat",
    "list_active_agents",
    "list_interfaces",
    "mark_task_completed",
    "query_agent",
    "query_interface",
    "register_agent",
    "register_file_change",
    "register_interface",
    "release_file",
    "release_file_lock",
    "respond_to_query",
    "send_message",
    "unregister_agent",
    "update_todo",
    "update_todo_list",
];

/// Build the MCP-facing [`ToolRegistry`] for a running [`Engine`].
///
/// `allowed_names` is an optional comma-separated list of tool names to
/// include. Pass `"all"` (or `None`) to include every tool. Any name not
/// produced by [`build_registry`] is silently ignored — this guards against
/// clients accidentally requesting a tool that was never registered.
pub fn build_mcp_registry(engine: Arc<Engine>, allowed_names: Option<&str>) -> ToolRegistry {
    let full = build_registry(engine.clone());

    let filter: Option<HashSet<&str>> = match allowed_names {
        None | Some("all") => None,
        Some(list) => Some(list.split(',').map(|s| s.trim()).collect()),
    };

    let Some(filter) = filter else {
        return full;
    };

    let mut restricted = ToolRegistry::new(engine);
    for name in full.names() {
        if filter.contains(name.as_str()) {
            if let Some(tool) = full.get(&name) {
                restricted.register_arc(tool);
            }
        }
    }
    restricted
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use agentmesh_core::EngineConfig;
    use agentmesh_store::MemoryBackend;

    use super::*;

    fn engine() -> Arc<Engine> {
        Arc::new(Engine::new(Arc::new(MemoryBackend::new()), EngineConfig::default()))
    }

    #[test]
    fn default_tool_names_constant_is_sorted() {
        let mut sorted = DEFAULT_TOOL_NAMES.to_vec();
        sorted.sort_unstable();
        assert_eq!(
            DEFAULT_TOOL_NAMES,
            sorted.as_slice(),
            "DEFAULT_TOOL_NAMES should be sorted for deterministic output"
        );
    }

    #[test]
    fn default_tool_names_matches_the_full_registry() {
        let reg = build_registry(engine());
        let mut names = reg.names();
        names.sort();
        assert_eq!(names, DEFAULT_TOOL_NAMES.to_vec());
    }

    #[test]
    fn all_keyword_includes_every_tool() {
        let reg = build_mcp_registry(engine(), Some("all"));
        assert_eq!(reg.names().len(), DEFAULT_TOOL_NAMES.len());
    }

    #[test]
    fn allowed_names_filter_restricts_tools() {
        let reg = build_mcp_registry(engine(), Some("heartbeat,list_active_agents"));
        let mut names = reg.names();
        names.sort();
        assert_eq!(names, vec!["heartbeat", "list_active_agents"]);
    }

    #[test]
    fn unknown_tool_name_in_filter_is_ignored() {
        let reg = build_mcp_registry(engine(), Some("heartbeat,nonexistent_tool"));
        assert_eq!(reg.names(), vec!["heartbeat"]);
    }

    #[test]
    fn whitespace_around_tool_names_is_trimmed() {
        let reg = build_mcp_registry(engine(), Some(" heartbeat , register_agent "));
        let mut names = reg.names();
        names.sort();
        assert_eq!(names, vec!["heartbeat", "register_agent"]);
    }
}
