// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C5 — per-file mutual-exclusion locks, time-bounded rather than
//! permanent (see the TTL-variant decision recorded in `DESIGN.md`), plus
//! the bounded recent-change log they feed.

use agentmesh_store::ProjectKeys;
use serde_json::json;

use crate::clock::now_iso8601;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::{FileLock, RecentChange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    NotLocked,
}

impl Engine {
    /// `announce_file_change` / `register_file_change` — acquire (or
    /// re-acquire, idempotently) the lock on `path`.
    pub async fn announce_file_change(
        &self,
        project_id: &str,
        session: &str,
        path: &str,
        change_type: &str,
        description: &str,
    ) -> EngineResult<()> {
        let keys = ProjectKeys::new(project_id);
        let lock_key = keys.file_lock(path);

        if let Some(raw) = self.store.str_get(&lock_key).await? {
            let existing: FileLock = serde_json::from_str(&raw)?;
            if existing.session != session {
                return Err(EngineError::Conflict(Box::new(existing)));
            }
            // Re-entrant re-announce by the same session: idempotent, but
            // still refreshes the lock and the change log below.
        }

        let lock = FileLock {
            session: session.to_string(),
            locked_at: now_iso8601(),
            change_type: change_type.to_string(),
            description: description.to_string(),
        };
        self.store
            .str_setex(&lock_key, self.config.lock_ttl_secs, &serde_json::to_string(&lock)?)
            .await?;

        self.push_recent_change(
            &keys,
            RecentChange {
                session: session.to_string(),
                file_path: path.to_string(),
                change_type: change_type.to_string(),
                description: description.to_string(),
                timestamp: lock.locked_at,
            },
        )
        .await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("file_change_announced"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("file_path".to_string(), json!(path));
        event.insert("change_type".to_string(), json!(change_type));
        self.broadcast_event(project_id, event, Some(session)).await?;

        Ok(())
    }

    /// `release_file_lock` / `release_file`.
    pub async fn release_file_lock(
        &self,
        project_id: &str,
        session: &str,
        path: &str,
    ) -> EngineResult<ReleaseOutcome> {
        let keys = ProjectKeys::new(project_id);
        let lock_key = keys.file_lock(path);

        let Some(raw) = self.store.str_get(&lock_key).await? else {
            return Ok(ReleaseOutcome::NotLocked);
        };
        let existing: FileLock = serde_json::from_str(&raw)?;
        if existing.session != session {
            return Err(EngineError::NotOwner);
        }

        self.store.del(&lock_key).await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("file_lock_released"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("file_path".to_string(), json!(path));
        self.broadcast_event(project_id, event, Some(session)).await?;

        Ok(ReleaseOutcome::Released)
    }

    /// `check_file_conflicts` — current lock holders for a batch of paths.
    pub async fn check_file_conflicts(
        &self,
        project_id: &str,
        paths: &[String],
    ) -> EngineResult<Vec<(String, FileLock)>> {
        let keys = ProjectKeys::new(project_id);
        let mut conflicts = Vec::new();
        for path in paths {
            if let Some(raw) = self.store.str_get(&keys.file_lock(path)).await? {
                conflicts.push((path.clone(), serde_json::from_str(&raw)?));
            }
        }
        Ok(conflicts)
    }

    /// `get_recent_changes` — newest-first view of the bounded log.
    pub async fn recent_changes(&self, project_id: &str) -> EngineResult<Vec<RecentChange>> {
        let keys = ProjectKeys::new(project_id);
        let raw = self.store.l_range(&keys.recent_changes(), 0, -1).await?;
        raw.iter()
            .map(|s| serde_json::from_str(s).map_err(EngineError::from))
            .collect()
    }

    /// Internal: release every lock held by `session` (used by the
    /// unregister cascade). The store exposes no secondary index from
    /// session to locked paths, so this scans the keyspace — acceptable
    /// for cleanup, which is not latency-sensitive.
    pub(crate) async fn release_all_locks_for_session(
        &self,
        project_id: &str,
        session: &str,
    ) -> EngineResult<()> {
        let keys = ProjectKeys::new(project_id);
        let pattern = format!("project:{project_id}:files:*");
        for key in self.store.keys(&pattern).await? {
            let Some(raw) = self.store.str_get(&key).await? else {
                continue;
            };
            let Ok(lock) = serde_json::from_str::<FileLock>(&raw) else {
                continue;
            };
            if lock.session == session {
                self.store.del(&key).await?;
            }
        }
        let _ = &keys; // keys only used to build the scan pattern's namespace
        Ok(())
    }

    async fn push_recent_change(&self, keys: &ProjectKeys, change: RecentChange) -> EngineResult<()> {
        let key = keys.recent_changes();
        // LPUSH puts the newest entry at the head, so trimming the front
        // always keeps the most recent `recent_changes_cap` entries.
        self.store.l_push(&key, &serde_json::to_string(&change)?).await?;
        self.store
            .l_trim_front(&key, self.config.recent_changes_cap)
            .await?;
        Ok(())
    }
}
