// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::{Engine, InterfaceQuery};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::{opt_str, require_str};

pub struct RegisterInterfaceTool {
    engine: Arc<Engine>,
}

impl RegisterInterfaceTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for RegisterInterfaceTool {
    fn name(&self) -> &str {
        "register_interface"
    }
    fn description(&self) -> &str {
        "Register (or overwrite) a named shared type/interface definition, visible to every agent in the project."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "name": {"type": "string"},
                "definition": {"type": "string"},
                "file_path": {"type": "string"}
            },
            "required": ["project_id", "session_name", "name", "definition"]
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
        let name = match require_str(&call.args, "name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let definition = match require_str(&call.args, "definition") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let file_path = opt_str(&call.args, "file_path").map(str::to_string);

        match self
            .engine
            .register_interface(project_id, session_name, name, definition, file_path)
            .await
        {
            Ok(()) => ToolOutput::ok(&call.id, json!({"status": "success"})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct QueryInterfaceTool {
    engine: Arc<Engine>,
}

impl QueryInterfaceTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for QueryInterfaceTool {
    fn name(&self) -> &str {
        "query_interface"
    }
    fn description(&self) -> &str {
        "Look up a named interface definition, falling back to a fuzzy case-insensitive substring match."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "name": {"type": "string"}
            },
            "required": ["project_id", "name"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let name = match require_str(&call.args, "name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self.engine.query_interface(project_id, name).await {
            Ok(InterfaceQuery::Found(def)) => ToolOutput::ok(
                &call.id,
                json!({
                    "status": "success",
                    "definition": def.definition,
                    "registered_by": def.registered_by,
                    "file_path": def.file_path,
                    "timestamp": def.timestamp,
                }),
            ),
            Ok(InterfaceQuery::NotFound { similar }) => ToolOutput::ok(
                &call.id,
                json!({"status": "not_found", "similar": similar}),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct ListInterfacesTool {
    engine: Arc<Engine>,
}

impl ListInterfacesTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for ListInterfacesTool {
    fn name(&self) -> &str {
        "list_interfaces"
    }
    fn description(&self) -> &str {
        "List every registered interface definition in a project."
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
        match self.engine.list_interfaces(project_id).await {
            Ok(entries) => {
                let interfaces: Vec<Value> = entries
                    .into_iter()
                    .map(|(name, def)| {
                        json!({
                            "name": name,
                            "definition": def.definition,
                            "registered_by": def.registered_by,
                            "file_path": def.file_path,
                            "timestamp": def.timestamp,
                        })
                    })
                    .collect();
                ToolOutput::ok(&call.id, json!({"interfaces": interfaces}))
            }
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
    async fn register_then_fuzzy_query() {
        let e = engine();
        RegisterInterfaceTool::new(e.clone())
            .execute(&ToolCall {
                id: "1".into(),
                name: "register_interface".into(),
                args: json!({
                    "project_id": "p1", "session_name": "s-1",
                    "name": "UserProfile", "definition": "has id,email"
                }),
            })
            .await;

        let out = QueryInterfaceTool::new(e)
            .execute(&ToolCall {
                id: "2".into(),
                name: "query_interface".into(),
                args: json!({"project_id": "p1", "name": "user"}),
            })
            .await;
        assert!(out.content.contains("not_found"));
        assert!(out.content.contains("UserProfile"));
    }
}
