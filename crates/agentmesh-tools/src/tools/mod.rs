// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod agents;
mod completion;
mod heartbeat;
mod interfaces;
mod locks;
mod messaging;
mod todos;
mod util;

use std::sync::Arc;

use agentmesh_core::Engine;

use crate::registry::ToolRegistry;

pub use agents::{ListActiveAgentsTool, RegisterAgentTool, UnregisterAgentTool};
pub use completion::MarkTaskCompletedTool;
pub use heartbeat::HeartbeatTool;
pub use interfaces::{ListInterfacesTool, QueryInterfaceTool, RegisterInterfaceTool};
pub use locks::{
    AnnounceFileChangeTool, CheckFileConflictsTool, GetRecentChangesTool, ReleaseFileLockTool,
};
pub use messaging::{BroadcastMessageTool, CheckMessagesTool, QueryAgentTool, RespondToQueryTool};
pub use todos::{AddTodoTool, GetAllTodosTool, GetMyTodosTool, UpdateTodoListTool, UpdateTodoTool};

/// Registers every coordination tool, including every alias named in the
/// tool surface, against a freshly constructed [`ToolRegistry`].
pub fn build_registry(engine: Arc<Engine>) -> ToolRegistry {
    let mut registry = ToolRegistry::new(engine.clone());

    registry.register(RegisterAgentTool::new(engine.clone()));
    registry.register(UnregisterAgentTool::new(engine.clone()));
    registry.register(ListActiveAgentsTool::new(engine.clone(), "list_active_agents"));
    registry.register(ListActiveAgentsTool::new(engine.clone(), "get_active_agents"));

    registry.register(HeartbeatTool::new(engine.clone()));

    registry.register(AddTodoTool::new(engine.clone()));
    registry.register(UpdateTodoTool::new(engine.clone()));
    registry.register(GetMyTodosTool::new(engine.clone(), "get_my_todos"));
    registry.register(GetMyTodosTool::new(engine.clone(), "get_todo_list"));
    registry.register(GetAllTodosTool::new(engine.clone()));
    registry.register(UpdateTodoListTool::new(engine.clone()));

    registry.register(QueryAgentTool::new(engine.clone(), "query_agent"));
    registry.register(QueryAgentTool::new(engine.clone(), "send_message"));
    registry.register(CheckMessagesTool::new(engine.clone(), "check_messages"));
    registry.register(CheckMessagesTool::new(engine.clone(), "get_messages"));
    registry.register(RespondToQueryTool::new(engine.clone()));
    registry.register(BroadcastMessageTool::new(engine.clone()));

    registry.register(AnnounceFileChangeTool::new(engine.clone(), "announce_file_change"));
    registry.register(AnnounceFileChangeTool::new(engine.clone(), "register_file_change"));
    registry.register(ReleaseFileLockTool::new(engine.clone(), "release_file_lock"));
    registry.register(ReleaseFileLockTool::new(engine.clone(), "release_file"));
    registry.register(CheckFileConflictsTool::new(engine.clone()));
    registry.register(GetRecentChangesTool::new(engine.clone()));

    registry.register(RegisterInterfaceTool::new(engine.clone()));
    registry.register(QueryInterfaceTool::new(engine.clone()));
    registry.register(ListInterfacesTool::new(engine.clone()));

    registry.register(MarkTaskCompletedTool::new(engine));

    registry
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agentmesh_core::EngineConfig;
    use agentmesh_store::MemoryBackend;

    use super::*;

    #[test]
    fn build_registry_registers_every_tool_surface_name() {
        let engine = Arc::new(Engine::new(Arc::new(MemoryBackend::new()), EngineConfig::default()));
        let registry = build_registry(engine);
        let names = registry.names();

        for expected in [
            "register_agent",
            "unregister_agent",
            "heartbeat",
            "list_active_agents",
            "get_active_agents",
            "add_todo",
            "update_todo",
            "get_my_todos",
            "get_todo_list",
            "get_all_todos",
            "update_todo_list",
            "query_agent",
            "send_message",
            "check_messages",
            "get_messages",
            "respond_to_query",
            "announce_file_change",
            "register_file_change",
            "release_file_lock",
            "release_file",
            "check_file_conflicts",
            "register_interface",
            "query_interface",
            "list_interfaces",
            "get_recent_changes",
            "broadcast_message",
            "mark_task_completed",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool: {expected}");
        }
    }
}
