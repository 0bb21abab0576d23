// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C10 — the completion signal. A task completing is recorded durably in
//! the store, and a best-effort filesystem drop-file is written for any
//! external process watching the completion directory (the orchestrator
//! SDK, out of scope here, polls for exactly this file).

use agentmesh_store::ProjectKeys;
use tracing::warn;

use crate::clock::now_iso8601;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::{AgentRecord, AgentStatus, CompletedTask};

impl Engine {
    /// `mark_task_completed`.
    pub async fn mark_task_completed(
        &self,
        project_id: &str,
        session: &str,
        task_id: &str,
    ) -> EngineResult<()> {
        let keys = ProjectKeys::new(project_id);

        let raw = self
            .store
            .h_get(&keys.agents(), session)
            .await?
            .ok_or_else(|| EngineError::NotFound(session.to_string()))?;
        let mut record: AgentRecord = serde_json::from_str(&raw)?;
        record.status = AgentStatus::Completed;
        self.store
            .h_set(&keys.agents(), session, &serde_json::to_string(&record)?)
            .await?;

        let completion = CompletedTask {
            task_id: task_id.to_string(),
            session_name: session.to_string(),
            completed_at: now_iso8601(),
        };
        self.store
            .h_set(
                &keys.completed_tasks(),
                task_id,
                &serde_json::to_string(&completion)?,
            )
            .await?;

        self.write_completion_file(session);

        Ok(())
    }

    /// Writes `{completion_dir}/{session}.status` containing `COMPLETED\n`.
    /// Filesystem errors are logged and swallowed: the durable record
    /// above is authoritative, this file is a convenience signal only.
    fn write_completion_file(&self, session: &str) {
        let path = self.config.completion_dir.join(format!("{session}.status"));
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, path = %parent.display(), "failed to create completion directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&path, "COMPLETED\n") {
            warn!(error = %e, path = %path.display(), "failed to write completion signal file");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agentmesh_store::MemoryBackend;

    use super::*;
    use crate::engine::EngineConfig;

    fn engine(dir: std::path::PathBuf) -> Engine {
        let mut cfg = EngineConfig::default();
        cfg.completion_dir = dir;
        Engine::new(Arc::new(MemoryBackend::new()), cfg)
    }

    #[tokio::test]
    async fn mark_completed_unknown_agent_fails() {
        let tmp = std::env::temp_dir().join("agentmesh-test-completion-unknown");
        let e = engine(tmp);
        let err = e
            .mark_task_completed("p1", "ghost", "T1")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_completed_flips_status_and_records_completion() {
        let tmp = std::env::temp_dir().join(format!(
            "agentmesh-test-completion-{}",
            uuid::Uuid::new_v4()
        ));
        let e = engine(tmp.clone());
        e.register_agent("p1", "s-1", "T1", "feat/a", "d")
            .await
            .unwrap();

        e.mark_task_completed("p1", "s-1", "T1").await.unwrap();

        let agents = e.list_agents("p1").await.unwrap();
        assert_eq!(agents[0].record.status, AgentStatus::Completed);

        let status_file = tmp.join("s-1.status");
        let contents = std::fs::read_to_string(&status_file).unwrap();
        assert_eq!(contents, "COMPLETED\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
