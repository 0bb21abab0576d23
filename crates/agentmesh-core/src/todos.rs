// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C8 — per-agent todo lists, stored as an ordered list of JSON items
//! (the list-of-items shape, chosen over a single-blob-with-updated_at
//! representation — see `DESIGN.md`).

use agentmesh_store::ProjectKeys;
use serde_json::json;
use uuid::Uuid;

use crate::clock::now_iso8601;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::types::{TodoItem, TodoStatus, TodoSummary};

impl Engine {
    /// `get_my_todos` / `get_todo_list` — ordered items for one agent.
    pub async fn list_todos(&self, project_id: &str, session: &str) -> EngineResult<Vec<TodoItem>> {
        self.read_todos(project_id, session).await
    }

    async fn read_todos(&self, project_id: &str, session: &str) -> EngineResult<Vec<TodoItem>> {
        let key = ProjectKeys::new(project_id).todos(session);
        let raw = self.store.l_range(&key, 0, -1).await?;
        raw.iter()
            .map(|s| serde_json::from_str(s).map_err(Into::into))
            .collect()
    }

    async fn write_todos(&self, project_id: &str, session: &str, items: &[TodoItem]) -> EngineResult<()> {
        let key = ProjectKeys::new(project_id).todos(session);
        self.store.del(&key).await?;
        for item in items {
            self.store.r_push(&key, &serde_json::to_string(item)?).await?;
        }
        Ok(())
    }

    /// `add_todo`.
    pub async fn add_todo(
        &self,
        project_id: &str,
        session: &str,
        text: &str,
        priority: u8,
    ) -> EngineResult<TodoItem> {
        let item = TodoItem {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            status: TodoStatus::Pending,
            priority,
            created_at: now_iso8601(),
            completed_at: None,
        };
        let key = ProjectKeys::new(project_id).todos(session);
        self.store.r_push(&key, &serde_json::to_string(&item)?).await?;
        Ok(item)
    }

    /// `update_todo` — soft-fails (returns `Ok(None)`) when `id` is not
    /// found, matching the spec's `not_found` response rather than a
    /// hard error.
    pub async fn update_todo(
        &self,
        project_id: &str,
        session: &str,
        id: &str,
        status: TodoStatus,
    ) -> EngineResult<Option<TodoItem>> {
        let mut items = self.read_todos(project_id, session).await?;
        let Some(item) = items.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        item.status = status;
        if status == TodoStatus::Completed {
            item.completed_at = Some(now_iso8601());
        }
        let updated = item.clone();
        self.write_todos(project_id, session, &items).await?;

        if status == TodoStatus::Completed {
            let mut event = serde_json::Map::new();
            event.insert("type".to_string(), json!("todo_completed"));
            event.insert("session_name".to_string(), json!(session));
            event.insert("todo_id".to_string(), json!(id));
            self.broadcast_event(project_id, event, Some(session)).await?;
        }

        Ok(Some(updated))
    }

    /// `update_todo_list` — bulk replace.
    pub async fn update_todo_list(
        &self,
        project_id: &str,
        session: &str,
        items: Vec<TodoItem>,
    ) -> EngineResult<usize> {
        let count = items.len();
        self.write_todos(project_id, session, &items).await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("todo_update"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("todo_count".to_string(), json!(count));
        self.broadcast_event(project_id, event, Some(session)).await?;

        Ok(count)
    }

    /// `get_all_todos` — every agent's items plus a derived summary.
    pub async fn list_all_todos(
        &self,
        project_id: &str,
    ) -> EngineResult<Vec<(String, Vec<TodoItem>, TodoSummary)>> {
        let keys = ProjectKeys::new(project_id);
        let sessions = self.store.h_keys(&keys.agents()).await?;
        let mut out = Vec::with_capacity(sessions.len());
        for session in sessions {
            let items = self.read_todos(project_id, &session).await?;
            let summary = TodoSummary::from_items(&items);
            out.push((session, items, summary));
        }
        Ok(out)
    }

    pub(crate) async fn delete_todos(&self, project_id: &str, session: &str) -> EngineResult<()> {
        self.store
            .del(&ProjectKeys::new(project_id).todos(session))
            .await?;
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

    async fn register(e: &Engine, project: &str, session: &str) {
        e.store
            .h_set(&ProjectKeys::new(project).agents(), session, "{}")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_then_list_preserves_order() {
        let e = engine();
        e.add_todo("p1", "s-1", "first", 1).await.unwrap();
        e.add_todo("p1", "s-1", "second", 2).await.unwrap();
        let items = e.list_todos("p1", "s-1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "first");
        assert_eq!(items[1].text, "second");
    }

    #[tokio::test]
    async fn update_sets_completed_at_only_on_completion() {
        let e = engine();
        let item = e.add_todo("p1", "s-1", "x", 1).await.unwrap();

        let updated = e
            .update_todo("p1", "s-1", &item.id, TodoStatus::InProgress)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed_at.is_none());

        let updated = e
            .update_todo("p1", "s-1", &item.id, TodoStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed_at.is_some());
    }

    #[tokio::test]
    async fn update_unknown_id_soft_fails() {
        let e = engine();
        let result = e
            .update_todo("p1", "s-1", "ghost", TodoStatus::Completed)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_todo_list_replaces_everything() {
        let e = engine();
        e.add_todo("p1", "s-1", "old", 1).await.unwrap();
        let replacement = vec![TodoItem {
            id: "new-1".into(),
            text: "new".into(),
            status: TodoStatus::Pending,
            priority: 1,
            created_at: now_iso8601(),
            completed_at: None,
        }];
        let count = e
            .update_todo_list("p1", "s-1", replacement)
            .await
            .unwrap();
        assert_eq!(count, 1);
        let items = e.list_todos("p1", "s-1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "new");
    }

    #[tokio::test]
    async fn list_all_todos_aggregates_across_agents() {
        let e = engine();
        register(&e, "p1", "s-1").await;
        register(&e, "p1", "s-2").await;
        e.add_todo("p1", "s-1", "a", 1).await.unwrap();
        let item = e.add_todo("p1", "s-1", "b", 1).await.unwrap();
        e.update_todo("p1", "s-1", &item.id, TodoStatus::Completed)
            .await
            .unwrap();

        let all = e.list_all_todos("p1").await.unwrap();
        assert_eq!(all.len(), 2);
        let (_, items, summary) = all.iter().find(|(s, _, _)| s == "s-1").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
    }
}
