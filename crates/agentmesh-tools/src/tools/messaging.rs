// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::{Engine, EngineError, SendOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::{opt_bool, opt_str, opt_u64, require_str};

/// `query_agent` / `send_message`.
pub struct QueryAgentTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl QueryAgentTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for QueryAgentTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Send a message to another registered agent, optionally blocking for a correlated response."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string", "description": "sender"},
                "to": {"type": "string", "description": "recipient session"},
                "query_type": {"type": "string"},
                "content": {},
                "wait_for_response": {"type": "boolean", "default": false},
                "timeout_seconds": {"type": "integer", "default": 30}
            },
            "required": ["project_id", "session_name", "to", "content"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let from = match require_str(&call.args, "session_name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let to = match require_str(&call.args, "to") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let content = call.args.get("content").cloned().unwrap_or(Value::Null);
        let query_type = opt_str(&call.args, "query_type").map(str::to_string);
        let wait_for_response = opt_bool(&call.args, "wait_for_response", false);
        let timeout_secs = opt_u64(&call.args, "timeout_seconds", 30);

        match self
            .engine
            .send_message(project_id, from, to, query_type, content, wait_for_response, timeout_secs)
            .await
        {
            Ok(SendOutcome::Sent { id }) => {
                ToolOutput::ok(&call.id, json!({"status": "sent", "id": id}))
            }
            Ok(SendOutcome::Received { content }) => {
                ToolOutput::ok(&call.id, json!({"status": "received", "response": content}))
            }
            Ok(SendOutcome::Timeout) => ToolOutput::ok(&call.id, json!({"status": "timeout"})),
            Err(EngineError::UnknownRecipient(who)) => ToolOutput::ok(
                &call.id,
                json!({"status": "error", "error": "unknown_recipient", "recipient": who}),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

/// `check_messages` / `get_messages`.
pub struct CheckMessagesTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl CheckMessagesTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for CheckMessagesTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Read and clear this session's inbox."
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
        match self.engine.check_messages(project_id, session_name).await {
            Ok(messages) => ToolOutput::ok(&call.id, json!({"messages": messages})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct RespondToQueryTool {
    engine: Arc<Engine>,
}

impl RespondToQueryTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for RespondToQueryTool {
    fn name(&self) -> &str {
        "respond_to_query"
    }
    fn description(&self) -> &str {
        "Respond to a query previously read via check_messages, correlated by message id."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string", "description": "responder"},
                "to": {"type": "string", "description": "original sender"},
                "message_id": {"type": "string"},
                "response": {}
            },
            "required": ["project_id", "session_name", "to", "message_id", "response"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let from = match require_str(&call.args, "session_name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let to = match require_str(&call.args, "to") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let message_id = match require_str(&call.args, "message_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let response = call.args.get("response").cloned().unwrap_or(Value::Null);

        match self
            .engine
            .respond_to_query(project_id, from, to, message_id, response)
            .await
        {
            Ok(()) => ToolOutput::ok(&call.id, json!({"status": "success"})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct BroadcastMessageTool {
    engine: Arc<Engine>,
}

impl BroadcastMessageTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for BroadcastMessageTool {
    fn name(&self) -> &str {
        "broadcast_message"
    }
    fn description(&self) -> &str {
        "Send a message to every other registered agent in the project."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "message_type": {"type": "string"},
                "content": {}
            },
            "required": ["project_id", "session_name", "message_type", "content"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let from = match require_str(&call.args, "session_name") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let message_type = match require_str(&call.args, "message_type") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let content = call.args.get("content").cloned().unwrap_or(Value::Null);

        match self
            .engine
            .broadcast_message(project_id, from, message_type, content)
            .await
        {
            Ok(count) => {
                ToolOutput::ok(&call.id, json!({"status": "success", "recipients": count}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}
