// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::Engine;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::require_str;

pub struct HeartbeatTool {
    engine: Arc<Engine>,
}

impl HeartbeatTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for HeartbeatTool {
    fn name(&self) -> &str {
        "heartbeat"
    }
    fn description(&self) -> &str {
        "Re-arm this session's liveness marker."
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
        match self.engine.heartbeat(project_id, session_name).await {
            Ok(()) => ToolOutput::ok(&call.id, json!({"status": "success"})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}
