// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C4 — liveness. A session's heartbeat is a TTL-bearing key; its mere
//! presence is the liveness signal. [`reap_loop`] is the single
//! background task per server process that notices absence and runs the
//! cleanup cascade.

use std::time::Duration;

use agentmesh_store::ProjectKeys;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::engine::Engine;
use crate::error::EngineResult;

impl Engine {
    /// Re-arm `session`'s liveness marker. Called on registration and by
    /// the tool dispatcher after every successful call attributable to a
    /// session (see `agentmesh-tools`).
    pub async fn heartbeat(&self, project_id: &str, session: &str) -> EngineResult<()> {
        let key = ProjectKeys::new(project_id).heartbeat(session);
        self.store
            .str_setex(&key, self.config.heartbeat_ttl_secs, "1")
            .await?;
        Ok(())
    }

    /// One reaper sweep: every registered agent across every project whose
    /// heartbeat key has expired is cleaned up and announced as timed out.
    /// Errors from a single project/session are logged and do not abort
    /// the sweep.
    async fn reap_once(&self) {
        let agent_keys = match self.store.keys(ProjectKeys::all_projects_pattern()).await {
            Ok(keys) => keys,
            Err(e) => {
                error!(error = %e, "heartbeat reaper: failed to enumerate projects");
                return;
            }
        };

        for agents_key in agent_keys {
            let Some(project_id) = ProjectKeys::project_id_from_agents_key(&agents_key) else {
                continue;
            };
            let project_id = project_id.to_string();
            let keys = ProjectKeys::new(&project_id);

            let sessions = match self.store.h_keys(&keys.agents()).await {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, project_id, "heartbeat reaper: failed to list agents");
                    continue;
                }
            };

            for session in sessions {
                let alive = match self.store.str_get(&keys.heartbeat(&session)).await {
                    Ok(v) => v.is_some(),
                    Err(e) => {
                        error!(error = %e, project_id, session, "heartbeat reaper: failed to check liveness");
                        continue;
                    }
                };
                if alive {
                    continue;
                }

                warn!(project_id, session, "reaping stale agent");
                if let Err(e) = self.cleanup_agent(&project_id, &session).await {
                    error!(error = %e, project_id, session, "heartbeat reaper: cleanup failed");
                    continue;
                }

                let mut event = serde_json::Map::new();
                event.insert("type".to_string(), json!("agent_timeout"));
                event.insert("session_name".to_string(), json!(session));
                event.insert("reason".to_string(), json!("heartbeat_timeout"));
                if let Err(e) = self.broadcast_event(&project_id, event, None).await {
                    error!(error = %e, project_id, session, "heartbeat reaper: broadcast failed");
                }
            }
        }
    }

    /// Runs the sweep every 30 seconds until `shutdown` resolves. Intended
    /// to be spawned once at server start and awaited to completion on
    /// shutdown.
    pub async fn run_reaper(&self, shutdown: impl std::future::Future<Output = ()>) {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    debug!("heartbeat reaper sweep starting");
                    self.reap_once().await;
                }
                _ = &mut shutdown => {
                    debug!("heartbeat reaper shutting down");
                    break;
                }
            }
        }
    }
}
