// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C3 — the agent registry and the cleanup cascade every exit path
//! (explicit unregister, heartbeat timeout) funnels through.

use agentmesh_store::ProjectKeys;
use serde_json::json;

use crate::clock::now_iso8601;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::{AgentRecord, AgentStatus, AgentView};

impl Engine {
    /// `register_agent` — overwrites any prior record for `session`,
    /// wipes its prior todos/inbox, arms the heartbeat, and returns the
    /// other agents currently active in the project.
    pub async fn register_agent(
        &self,
        project_id: &str,
        session: &str,
        task_id: &str,
        branch: &str,
        description: &str,
    ) -> EngineResult<Vec<AgentView>> {
        let keys = ProjectKeys::new(project_id);
        let record = AgentRecord {
            task_id: task_id.to_string(),
            branch: branch.to_string(),
            description: description.to_string(),
            status: AgentStatus::Active,
            started_at: now_iso8601(),
            project_id: project_id.to_string(),
        };
        self.store
            .h_set(&keys.agents(), session, &serde_json::to_string(&record)?)
            .await?;

        self.heartbeat(project_id, session).await?;
        self.delete_todos(project_id, session).await?;
        self.store.del(&keys.messages(session)).await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("agent_joined"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("description".to_string(), json!(description));
        self.broadcast_event(project_id, event, Some(session)).await?;

        let others = self
            .list_agents(project_id)
            .await?
            .into_iter()
            .filter(|a| a.session_name != session)
            .collect();
        Ok(others)
    }

    /// `unregister_agent`.
    pub async fn unregister_agent(&self, project_id: &str, session: &str) -> EngineResult<()> {
        let keys = ProjectKeys::new(project_id);
        if !self.store.h_exists(&keys.agents(), session).await? {
            return Err(EngineError::NotFound(session.to_string()));
        }

        // The todo summary must be read before cleanup_agent runs, since
        // cleanup deletes the session's todo list.
        let todos = self.list_todos(project_id, session).await?;
        let summary = crate::types::TodoSummary::from_items(&todos);

        self.cleanup_agent(project_id, session).await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("agent_left"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("reason".to_string(), json!("task_complete"));
        event.insert(
            "todo_summary".to_string(),
            json!({
                "total": summary.total,
                "completed": summary.completed,
                "pending": summary.pending,
                "in_progress": summary.in_progress,
            }),
        );
        self.broadcast_event(project_id, event, None).await?;

        Ok(())
    }

    /// `list_active_agents` / `get_active_agents` — best-effort; may
    /// briefly include an agent whose heartbeat has expired but has not
    /// yet been reaped.
    pub async fn list_agents(&self, project_id: &str) -> EngineResult<Vec<AgentView>> {
        let keys = ProjectKeys::new(project_id);
        let entries = self.store.h_get_all(&keys.agents()).await?;
        entries
            .into_iter()
            .map(|(session_name, raw)| {
                serde_json::from_str::<AgentRecord>(&raw)
                    .map(|record| AgentView { session_name, record })
                    .map_err(EngineError::from)
            })
            .collect()
    }

    /// Internal cascade shared by explicit unregister and reaper timeout.
    /// Order matters: locks first, then todos, then inbox, then the
    /// agent record itself — a reader that sees the agent record gone
    /// but a lock still present must treat the lock as held, so the lock
    /// must never be the last thing standing.
    pub(crate) async fn cleanup_agent(&self, project_id: &str, session: &str) -> EngineResult<()> {
        self.release_all_locks_for_session(project_id, session).await?;
        self.delete_todos(project_id, session).await?;
        let keys = ProjectKeys::new(project_id);
        self.store.del(&keys.messages(session)).await?;
        self.store.h_del(&keys.agents(), session).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agentmesh_store::MemoryBackend;

    use super::*;
    use crate::engine::EngineConfig;

    fn engine() -> Engine {
        Engine::new(Arc::new(MemoryBackend::new()), EngineConfig::default())
    }

    #[tokio::test]
    async fn register_arms_heartbeat_and_returns_other_agents() {
        let e = engine();
        e.register_agent("p1", "s-1", "T1", "feat/a", "first")
            .await
            .unwrap();
        let others = e
            .register_agent("p1", "s-2", "T2", "feat/b", "second")
            .await
            .unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].session_name, "s-1");

        let key = ProjectKeys::new("p1").heartbeat("s-2");
        assert!(e.store.str_get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn register_is_idempotent_and_wipes_prior_state() {
        let e = engine();
        e.register_agent("p1", "s-1", "T1", "feat/a", "first")
            .await
            .unwrap();
        e.add_todo("p1", "s-1", "leftover", 1).await.unwrap();

        e.register_agent("p1", "s-1", "T2", "feat/b", "re-registered")
            .await
            .unwrap();

        let todos = e.list_todos("p1", "s-1").await.unwrap();
        assert!(todos.is_empty());
        let agents = e.list_agents("p1").await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].record.task_id, "T2");
    }

    #[tokio::test]
    async fn unregister_unknown_agent_fails() {
        let e = engine();
        let err = e.unregister_agent("p1", "ghost").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn unregister_runs_full_cleanup_cascade() {
        let e = engine();
        e.register_agent("p1", "s-1", "T1", "feat/a", "d")
            .await
            .unwrap();
        e.announce_file_change("p1", "s-1", "a.rs", "edit", "d")
            .await
            .unwrap();
        e.add_todo("p1", "s-1", "x", 1).await.unwrap();

        e.unregister_agent("p1", "s-1").await.unwrap();

        assert!(e.list_agents("p1").await.unwrap().is_empty());
        assert!(e.list_todos("p1", "s-1").await.unwrap().is_empty());
        let conflicts = e
            .check_file_conflicts("p1", &["a.rs".to_string()])
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn unregister_broadcasts_agent_left_to_others() {
        let e = engine();
        e.register_agent("p1", "s-1", "T1", "feat/a", "d")
            .await
            .unwrap();
        e.register_agent("p1", "s-2", "T2", "feat/b", "d")
            .await
            .unwrap();
        // clear the agent_joined noise from registration
        e.check_messages("p1", "s-2").await.unwrap();

        e.unregister_agent("p1", "s-1").await.unwrap();

        let inbox = e.check_messages("p1", "s-2").await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, "agent_left");
    }

    #[tokio::test]
    async fn unregister_broadcasts_todo_summary_computed_before_cleanup() {
        let e = engine();
        e.register_agent("p1", "s-1", "T1", "feat/a", "d")
            .await
            .unwrap();
        e.register_agent("p1", "s-2", "T2", "feat/b", "d")
            .await
            .unwrap();
        e.check_messages("p1", "s-2").await.unwrap();

        let item = e.add_todo("p1", "s-1", "a", 1).await.unwrap();
        e.add_todo("p1", "s-1", "b", 1).await.unwrap();
        e.update_todo("p1", "s-1", &item.id, crate::types::TodoStatus::Completed)
            .await
            .unwrap();

        e.unregister_agent("p1", "s-1").await.unwrap();

        let inbox = e.check_messages("p1", "s-2").await.unwrap();
        let left = inbox.iter().find(|m| m.kind == "agent_left").unwrap();
        assert_eq!(left.extra["todo_summary"]["total"], 2);
        assert_eq!(left.extra["todo_summary"]["completed"], 1);
        assert_eq!(left.extra["todo_summary"]["pending"], 1);
        assert_eq!(left.extra["todo_summary"]["in_progress"], 0);
    }
}
