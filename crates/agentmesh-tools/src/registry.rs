// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;

use agentmesh_core::Engine;
use tracing::warn;

use crate::{Tool, ToolCall, ToolOutput};

/// A tool schema — the shape the MCP bridge needs to advertise a tool,
/// kept independent of any particular MCP crate's own schema type.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Central registry holding every coordination tool plus the shared
/// engine handle used to re-arm a caller's heartbeat after a successful
/// call (C9: "every handler that takes a session_name MUST re-arm that
/// session's heartbeat on success" — implemented once here instead of in
/// every tool).
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    engine: Arc<Engine>,
}

impl ToolRegistry {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            tools: HashMap::new(),
            engine,
        }
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Register an already-shared tool, e.g. one borrowed from another
    /// registry when building a restricted subset.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let Some(tool) = self.tools.get(&call.name) else {
            return ToolOutput::err(&call.id, format!("unknown tool: {}", call.name));
        };

        let output = tool.execute(call).await;
        if !output.is_error {
            self.rearm_heartbeat(call).await;
        }
        output
    }

    async fn rearm_heartbeat(&self, call: &ToolCall) {
        let project_id = call.args.get("project_id").and_then(|v| v.as_str());
        let session_name = call.args.get("session_name").and_then(|v| v.as_str());
        if let (Some(project_id), Some(session_name)) = (project_id, session_name) {
            if let Err(e) = self.engine.heartbeat(project_id, session_name).await {
                warn!(error = %e, project_id, session_name, "failed to re-arm heartbeat");
            }
        }
    }
}
