// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::{Engine, EngineError};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::{opt_str, require_str};

pub struct RegisterAgentTool {
    engine: Arc<Engine>,
}

impl RegisterAgentTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for RegisterAgentTool {
    fn name(&self) -> &str {
        "register_agent"
    }
    fn description(&self) -> &str {
        "Register this session as an active agent in a project, clearing any prior state for the same session."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "task_id": {"type": "string"},
                "branch": {"type": "string"},
                "description": {"type": "string"}
            },
            "required": ["project_id", "session_name", "task_id", "branch", "description"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let session_name = match require_str(&call.args, "session_name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let task_id = opt_str(&call.args, "task_id").unwrap_or_default();
        let branch = opt_str(&call.args, "branch").unwrap_or_default();
        let description = opt_str(&call.args, "description").unwrap_or_default();

        match self
            .engine
            .register_agent(project_id, session_name, task_id, branch, description)
            .await
        {
            Ok(others) => ToolOutput::ok(
                &call.id,
                json!({
                    "status": "success",
                    "session_name": session_name,
                    "other_active_agents": others,
                }),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct UnregisterAgentTool {
    engine: Arc<Engine>,
}

impl UnregisterAgentTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for UnregisterAgentTool {
    fn name(&self) -> &str {
        "unregister_agent"
    }
    fn description(&self) -> &str {
        "Unregister this session, releasing its locks and clearing its todos and inbox."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"}
            },
            "required": ["project_id", "session_name"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let session_name = match require_str(&call.args, "session_name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self.engine.unregister_agent(project_id, session_name).await {
            Ok(()) => ToolOutput::ok(
                &call.id,
                json!({"status": "success", "message": format!("Agent {session_name} unregistered")}),
            ),
            Err(EngineError::NotFound(_)) => {
                ToolOutput::ok(&call.id, json!({"status": "not_found"}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

/// `list_active_agents` / `get_active_agents` — the same handler
/// registered under both names.
pub struct ListActiveAgentsTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl ListActiveAgentsTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for ListActiveAgentsTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "List every agent currently registered in a project."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"project_id": {"type": "string"}},
            "required": ["project_id"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        match self.engine.list_agents(project_id).await {
            Ok(agents) => ToolOutput::ok(&call.id, json!({"agents": agents})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agentmesh_core::EngineConfig;
    use agentmesh_store::MemoryBackend;
    use serde_json::json;

    use super::*;

    fn engine() -> Arc<Engine> {
        Arc::new(Engine::new(Arc::new(MemoryBackend::new()), EngineConfig::default()))
    }

    #[tokio::test]
    async fn register_then_list_returns_it() {
        let e = engine();
        let register = RegisterAgentTool::new(e.clone());
        let out = register
            .execute(&ToolCall {
                id: "1".into(),
                name: "register_agent".into(),
                args: json!({
                    "project_id": "p1", "session_name": "s-1",
                    "task_id": "T1", "branch": "feat/a", "description": "d"
                }),
            })
            .await;
        assert!(!out.is_error);
        assert!(out.content.contains("\"other_active_agents\":[]"));

        let list = ListActiveAgentsTool::new(e, "list_active_agents");
        let out = list
            .execute(&ToolCall {
                id: "2".into(),
                name: "list_active_agents".into(),
                args: json!({"project_id": "p1"}),
            })
            .await;
        assert!(out.content.contains("s-1"));
    }

    #[tokio::test]
    async fn unregister_missing_agent_is_not_found() {
        let e = engine();
        let tool = UnregisterAgentTool::new(e);
        let out = tool
            .execute(&ToolCall {
                id: "1".into(),
                name: "unregister_agent".into(),
                args: json!({"project_id": "p1", "session_name": "ghost"}),
            })
            .await;
        assert!(!out.is_error);
        assert!(out.content.contains("not_found"));
    }

    #[tokio::test]
    async fn missing_required_field_is_invalid_arguments() {
        let e = engine();
        let tool = RegisterAgentTool::new(e);
        let out = tool
            .execute(&ToolCall {
                id: "1".into(),
                name: "register_agent".into(),
                args: json!({"project_id": "p1"}),
            })
            .await;
        assert!(out.is_error);
        assert!(out.content.contains("invalid_arguments"));
    }
}
