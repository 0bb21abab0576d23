// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! C7 — named shared interface/type definitions, visible to every agent
//! in a project.

use agentmesh_store::ProjectKeys;
use serde_json::json;

use crate::clock::now_iso8601;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::types::InterfaceDefinition;

/// Result of [`Engine::query_interface`].
pub enum InterfaceQuery {
    Found(InterfaceDefinition),
    NotFound { similar: Vec<String> },
}

impl Engine {
    /// `register_interface` — last-writer-wins.
    pub async fn register_interface(
        &self,
        project_id: &str,
        session: &str,
        name: &str,
        definition: &str,
        file_path: Option<String>,
    ) -> EngineResult<()> {
        let keys = ProjectKeys::new(project_id);
        let entry = InterfaceDefinition {
            definition: definition.to_string(),
            registered_by: session.to_string(),
            file_path,
            timestamp: now_iso8601(),
        };
        self.store
            .h_set(&keys.interfaces(), name, &serde_json::to_string(&entry)?)
            .await?;

        let mut event = serde_json::Map::new();
        event.insert("type".to_string(), json!("interface_registered"));
        event.insert("session_name".to_string(), json!(session));
        event.insert("name".to_string(), json!(name));
        event.insert("definition".to_string(), json!(definition));
        self.broadcast_event(project_id, event, Some(session)).await?;

        Ok(())
    }

    /// `query_interface` — exact match, falling back to a case-insensitive
    /// substring search over registered names.
    pub async fn query_interface(
        &self,
        project_id: &str,
        name: &str,
    ) -> EngineResult<InterfaceQuery> {
        let keys = ProjectKeys::new(project_id);
        if let Some(raw) = self.store.h_get(&keys.interfaces(), name).await? {
            return Ok(InterfaceQuery::Found(serde_json::from_str(&raw)?));
        }

        let needle = name.to_lowercase();
        let similar = self
            .store
            .h_keys(&keys.interfaces())
            .await?
            .into_iter()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .collect();
        Ok(InterfaceQuery::NotFound { similar })
    }

    /// `list_interfaces` — full hash content.
    pub async fn list_interfaces(
        &self,
        project_id: &str,
    ) -> EngineResult<Vec<(String, InterfaceDefinition)>> {
        let keys = ProjectKeys::new(project_id);
        self.store
            .h_get_all(&keys.interfaces())
            .await?
            .into_iter()
            .map(|(name, raw)| {
                serde_json::from_str(&raw)
                    .map(|def| (name, def))
                    .map_err(Into::into)
            })
            .collect()
    }
}
