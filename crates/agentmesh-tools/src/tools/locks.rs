// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use agentmesh_core::{Engine, EngineError, ReleaseOutcome};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCall, ToolOutput};
use crate::tools::util::{opt_str, require_str, require_str_array};

/// `announce_file_change` / `register_file_change`.
pub struct AnnounceFileChangeTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl AnnounceFileChangeTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for AnnounceFileChangeTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Acquire the exclusive lock on a file path, failing with a conflict if another session holds it."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "file_path": {"type": "string"},
                "change_type": {"type": "string"},
                "description": {"type": "string", "default": ""}
            },
            "required": ["project_id", "session_name", "file_path", "change_type"]
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
        let file_path = match require_str(&call.args, "file_path") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let change_type = match require_str(&call.args, "change_type") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let description = opt_str(&call.args, "description").unwrap_or("");

        match self
            .engine
            .announce_file_change(project_id, session_name, file_path, change_type, description)
            .await
        {
            Ok(()) => {
                ToolOutput::ok(&call.id, json!({"status": "locked", "file_path": file_path}))
            }
            Err(EngineError::Conflict(lock)) => ToolOutput::ok(
                &call.id,
                json!({"status": "conflict", "lock_info": lock}),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

/// `release_file_lock` / `release_file`.
pub struct ReleaseFileLockTool {
    engine: Arc<Engine>,
    name: &'static str,
}

impl ReleaseFileLockTool {
    pub fn new(engine: Arc<Engine>, name: &'static str) -> Self {
        Self { engine, name }
    }
}

#[async_trait]
impl Tool for ReleaseFileLockTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Release a file lock held by this session."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "session_name": {"type": "string"},
                "file_path": {"type": "string"}
            },
            "required": ["project_id", "session_name", "file_path"]
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
        let file_path = match require_str(&call.args, "file_path") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self
            .engine
            .release_file_lock(project_id, session_name, file_path)
            .await
        {
            Ok(ReleaseOutcome::Released) => {
                ToolOutput::ok(&call.id, json!({"status": "released", "file_path": file_path}))
            }
            Ok(ReleaseOutcome::NotLocked) => {
                ToolOutput::ok(&call.id, json!({"status": "not_locked", "file_path": file_path}))
            }
            Err(EngineError::NotOwner) => ToolOutput::ok(
                &call.id,
                json!({"status": "error", "error": "not_owner"}),
            ),
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct CheckFileConflictsTool {
    engine: Arc<Engine>,
}

impl CheckFileConflictsTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for CheckFileConflictsTool {
    fn name(&self) -> &str {
        "check_file_conflicts"
    }
    fn description(&self) -> &str {
        "Check which of a batch of file paths are currently locked."
    }
    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": {"type": "string"},
                "file_paths": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["project_id", "file_paths"]
        })
    }
    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let project_id = match require_str(&call.args, "project_id") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };
        let file_paths = match require_str_array(&call.args, "file_paths") {
            Ok(v) => v,
            Err(e) => return ToolOutput::err(&call.id, e),
        };

        match self.engine.check_file_conflicts(project_id, &file_paths).await {
            Ok(conflicts) => {
                let conflicts: Vec<Value> = conflicts
                    .into_iter()
                    .map(|(path, lock)| {
                        json!({
                            "file_path": path,
                            "session": lock.session,
                            "locked_at": lock.locked_at,
                            "change_type": lock.change_type,
                            "description": lock.description,
                        })
                    })
                    .collect();
                ToolOutput::ok(&call.id, json!({"conflicts": conflicts}))
            }
            Err(e) => ToolOutput::err(&call.id, e.to_string()),
        }
    }
}

pub struct GetRecentChangesTool {
    engine: Arc<Engine>,
}

impl GetRecentChangesTool {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for GetRecentChangesTool {
    fn name(&self) -> &str {
        "get_recent_changes"
    }
    fn description(&self) -> &str {
        "List the most recent file-change announcements in a project (bounded log)."
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
        match self.engine.recent_changes(project_id).await {
            Ok(changes) => ToolOutput::ok(&call.id, json!({"changes": changes})),
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
    async fn announce_then_conflicting_announce() {
        let e = engine();
        let announce = AnnounceFileChangeTool::new(e.clone(), "announce_file_change");
        let out = announce
            .execute(&ToolCall {
                id: "1".into(),
                name: "announce_file_change".into(),
                args: json!({
                    "project_id": "p1", "session_name": "s-1",
                    "file_path": "src/a.ts", "change_type": "create", "description": "d"
                }),
            })
            .await;
        assert!(out.content.contains("\"status\":\"locked\""));

        let out = announce
            .execute(&ToolCall {
                id: "2".into(),
                name: "announce_file_change".into(),
                args: json!({
                    "project_id": "p1", "session_name": "s-2",
                    "file_path": "src/a.ts", "change_type": "modify", "description": "d"
                }),
            })
            .await;
        assert!(out.content.contains("\"status\":\"conflict\""));
        assert!(out.content.contains("\"session\":\"s-1\""));
    }

    #[tokio::test]
    async fn release_by_non_owner_then_by_owner() {
        let e = engine();
        AnnounceFileChangeTool::new(e.clone(), "announce_file_change")
            .execute(&ToolCall {
                id: "1".into(),
                name: "announce_file_change".into(),
                args: json!({
                    "project_id": "p1", "session_name": "s-1",
                    "file_path": "a.ts", "change_type": "create", "description": ""
                }),
            })
            .await;

        let release = ReleaseFileLockTool::new(e, "release_file_lock");
        let out = release
            .execute(&ToolCall {
                id: "2".into(),
                name: "release_file_lock".into(),
                args: json!({"project_id": "p1", "session_name": "s-2", "file_path": "a.ts"}),
            })
            .await;
        assert!(out.content.contains("not_owner"));

        let out = release
            .execute(&ToolCall {
                id: "3".into(),
                name: "release_file_lock".into(),
                args: json!({"project_id": "p1", "session_name": "s-1", "file_path": "a.ts"}),
            })
            .await;
        assert!(out.content.contains("\"status\":\"released\""));
    }
}
