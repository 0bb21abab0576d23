// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! Deterministic key layout for the coordination store.
//!
//! Every key lives under `project:{project_id}:...`. This module is the
//! only place in the workspace that knows that layout — every other crate
//! goes through [`ProjectKeys`] rather than formatting keys itself.

/// Builds every key used by a single project's state.
///
/// `project_id` is an opaque, caller-supplied string; it is not validated
/// or normalized (callers must agree on canonical form, same as file paths
/// in the lock manager).
#[derive(Debug, Clone)]
pub struct ProjectKeys {
    project_id: String,
}

impl ProjectKeys {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn base(&self) -> String {
        format!("project:{}", self.project_id)
    }

    /// Hash: session name → agent record JSON.
    pub fn agents(&self) -> String {
        format!("{}:agents", self.base())
    }

    /// String, TTL-bearing: liveness marker for one session.
    pub fn heartbeat(&self, session: &str) -> String {
        format!("{}:heartbeat:{}", self.base(), session)
    }

    /// List: FIFO inbox for one session.
    pub fn messages(&self, session: &str) -> String {
        format!("{}:messages:{}", self.base(), session)
    }

    /// List: ordered todo items for one session.
    pub fn todos(&self, session: &str) -> String {
        format!("{}:todos:{}", self.base(), session)
    }

    /// String, TTL-bearing: the time-bounded lock for one file path.
    pub fn file_lock(&self, path: &str) -> String {
        format!("{}:files:{}", self.base(), path)
    }

    /// Hash: interface name → definition JSON.
    pub fn interfaces(&self) -> String {
        format!("{}:interfaces", self.base())
    }

    /// List: bounded recent-change log, newest first.
    pub fn recent_changes(&self) -> String {
        format!("{}:recent_changes", self.base())
    }

    /// Hash: task_id → completion record JSON.
    pub fn completed_tasks(&self) -> String {
        format!("{}:completed_tasks", self.base())
    }

    /// Scan pattern matching the `agents` hash key of every project.
    pub fn all_projects_pattern() -> &'static str {
        "project:*:agents"
    }

    /// Extract the project ID from a key matching [`Self::all_projects_pattern`].
    pub fn project_id_from_agents_key(key: &str) -> Option<&str> {
        key.strip_prefix("project:")?.strip_suffix(":agents")
    }
}
