// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::{Engine, EngineError};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::require_str;

pub struct MarkTaskCompletedTool {
    engine: Arc<Engine>,
}

impl MarkTaskCompletedTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for MarkTaskCompletedTool {
    fn name(&self) -> &str {
        "mark_task_completed"
    }
    fn description(&self) -> &str {
        "Record a task as completed and flip the agent's status; best-effort drop a completion signal file."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "task_id": {"type": "string"}
            },
            "required": ["project_id", "session_name", "task_id"]
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
        let task_id = match require_str(&call.args, "task_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self
            .engine
            .mark_task_completed(project_id, session_name, task_id)
            .await
        {
            Ok(()) => ToolOutput::ok(&call.id, json!({"status": "success"})),
            Err(EngineError::NotFound(_)) => {
                ToolOutput::ok(&call.id, json!({"status": "not_found"}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}
