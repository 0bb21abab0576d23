// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! Wire/storage record shapes. Every struct here is the JSON stored under
//! the corresponding [`agentmesh_store::ProjectKeys`] key.

use serde::{Deserialize, Serialize};

/// An agent's registration record — the value stored in the `agents` hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentRecord {
    pub task_id: String,
    pub branch: String,
    pub description: String,
    pub status: AgentStatus,
    pub started_at: String,
    pub project_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Completed,
}

/// An [`AgentRecord`] paired with the session name it is keyed by — the
/// shape returned from listing operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentView {
    pub session_name: String,
    #[serde(flatten)]
    pub record: AgentRecord,
}

/// A file lock — the value stored at a `files:{path}` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileLock {
    pub session: String,
    pub locked_at: String,
    pub change_type: String,
    pub description: String,
}

/// One entry in the bounded recent-change log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentChange {
    pub session: String,
    pub file_path: String,
    pub change_type: String,
    pub description: String,
    pub timestamp: String,
}

/// A message in an agent's inbox (also used for internal events — they
/// share the wire shape and the same queue).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub from: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_to: Option<String>,
    pub content: serde_json::Value,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_response: Option<bool>,
    /// Present on `broadcast`-delivered events other than plain messages;
    /// carries whatever extra fields the event wants (e.g. `session_name`).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

/// One todo item, as stored in a session's ordered todo list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub status: TodoStatus,
    pub priority: u8,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Aggregate counts over one agent's todo list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TodoSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub blocked: usize,
}

impl TodoSummary {
    pub fn from_items(items: &[TodoItem]) -> Self {
        let mut s = TodoSummary::default();
        s.total = items.len();
        for item in items {
            match item.status {
                TodoStatus::Completed => s.completed += 1,
                TodoStatus::Pending => s.pending += 1,
                TodoStatus::InProgress => s.in_progress += 1,
                TodoStatus::Blocked => s.blocked += 1,
            }
        }
        s
    }
}

/// A named, shared interface/type definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceDefinition {
    pub definition: String,
    pub registered_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub timestamp: String,
}

/// A completed-task record — the value stored in the `completed_tasks` hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedTask {
    pub task_id: String,
    pub session_name: String,
    pub completed_at: String,
}
