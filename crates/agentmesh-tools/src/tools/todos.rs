// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::types::{TodoItem, TodoStatus, TodoSummary};
use agentmesh_core::Engine;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::{opt_u64, require_str};

pub struct AddTodoTool {
    engine: Arc<Engine>,
}

impl AddTodoTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for AddTodoTool {
    fn name(&self) -> &str {
        "add_todo"
    }
    fn description(&self) -> &str {
        "Append a pending todo item to this session's list."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "text": {"type": "string"},
                "priority": {"type": "integer", "default": 1}
            },
            "required": ["project_id", "session_name", "text"]
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
        let text = match require_str(&call.args, "text") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let priority = opt_u64(&call.args, "priority", 1) as u8;

        match self.engine.add_todo(project_id, session_name, text, priority).await {
            Ok(item) => ToolOutput::ok(&call.id, json!({"status": "success", "todo": item})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct UpdateTodoTool {
    engine: Arc<Engine>,
}

impl UpdateTodoTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for UpdateTodoTool {
    fn name(&self) -> &str {
        "update_todo"
    }
    fn description(&self) -> &str {
        "Update the status of one of this session's todo items by id."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "todo_id": {"type": "string"},
                "status": {"type": "string", "enum": ["pending", "in_progress", "completed", "blocked"]}
            },
            "required": ["project_id", "session_name", "todo_id", "status"]
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
        let todo_id = match require_str(&call.args, "todo_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let status = match require_str(&call.args, "status").and_then(parse_status) {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self
            .engine
            .update_todo(project_id, session_name, todo_id, status)
            .await
        {
            Ok(Some(item)) => ToolOutput::ok(&call.id, json!({"status": "success", "todo": item})),
            Ok(None) => ToolOutput::ok(&call.id, json!({"status": "not_found"})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

fn parse_status(raw: &str) -> Result<TodoStatus, String> {
    match raw {
        "pending" => Ok(TodoStatus::Pending),
        "in_progress" => Ok(TodoStatus::InProgress),
        "completed" => Ok(TodoStatus::Completed),
        "blocked" => Ok(TodoStatus::Blocked),
        other => Err(format!("invalid_arguments: unknown status '{other}'")),
    }
}

/// `get_my_todos` / `get_todo_list`.
pub struct GetMyTodosTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl GetMyTodosTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for GetMyTodosTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "List this session's todo items in order."
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
        match self.engine.list_todos(project_id, session_name).await {
            Ok(items) => ToolOutput::ok(&call.id, json!({"todos": items})),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct GetAllTodosTool {
    engine: Arc<Engine>,
}

impl GetAllTodosTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for GetAllTodosTool {
    fn name(&self) -> &str {
        "get_all_todos"
    }
    fn description(&self) -> &str {
        "List every agent's todos in a project, with per-agent summaries."
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
        match self.engine.list_all_todos(project_id).await {
            Ok(all) => {
                let agents: Vec<Value> = all
                    .into_iter()
                    .map(|(session_name, todos, summary): (String, Vec<TodoItem>, TodoSummary)| {
                        json!({"session_name": session_name, "todos": todos, "summary": summary})
                    })
                    .collect();
                ToolOutput::ok(&call.id, json!({"agents": agents}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct UpdateTodoListTool {
    engine: Arc<Engine>,
}

impl UpdateTodoListTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for UpdateTodoListTool {
    fn name(&self) -> &str {
        "update_todo_list"
    }
    fn description(&self) -> &str {
        "Bulk-replace this session's entire todo list."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "todos": {"type": "array"}
            },
            "required": ["project_id", "session_name", "todos"]
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
        let todos: Vec<TodoItem> = match call.args.get("todos").cloned() {
            Some(v) => match serde_json::from_value(v) {
                Ok(items) => items,
                Err(e) => {
                    return ToolOutput::err(&call.id, format!("invalid_arguments: {e}"))
                }
            },
            None => return ToolOutput::err(&call.id, "invalid_arguments: missing field 'todos'"),
        };

        match self
            .engine
            .update_todo_list(project_id, session_name, todos)
            .await
        {
            Ok(count) => {
                ToolOutput::ok(&call.id, json!({"status": "success", "todo_count": count}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}
