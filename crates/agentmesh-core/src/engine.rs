// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`Engine`] — the coordination engine. Holds the one shared mutable
//! resource (the store handle) plus the small amount of runtime config
//! every operation needs (heartbeat TTL, lock TTL, completion-file
//! directory). All domain operations are inherent methods on `Engine`,
//! split across sibling modules by concern (`agents`, `heartbeat`,
//! `locks`, `messaging`, `interfaces`, `todos`, `completion`).
//!
//! No process-wide singletons or in-process locks exist beyond this
//! struct — every method composes pure calls through
//! [`agentmesh_store::StoreBackend`], which is itself the only mutable
//! boundary.

use std::path::PathBuf;
use std::sync::Arc;

use agentmesh_store::StoreBackend;

/// Runtime configuration for the engine. See `agentmesh-config` for how
/// this is populated from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Heartbeat TTL in seconds (`HEARTBEAT_TIMEOUT`, default 120).
    pub heartbeat_ttl_secs: u64,
    /// File lock TTL in seconds (`AGENTMESH_LOCK_TTL`, default 300).
    pub lock_ttl_secs: u64,
    /// Directory completion-signal drop-files are written to.
    pub completion_dir: PathBuf,
    /// Max length of the recent-changes log before trimming.
    pub recent_changes_cap: isize,
    /// Poll interval for the request/response wait protocol, in milliseconds.
    pub wait_poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heartbeat_ttl_secs: 120,
            lock_ttl_secs: 300,
            completion_dir: PathBuf::from("/tmp/splitmind-status"),
            recent_changes_cap: 100,
            wait_poll_interval_ms: 500,
        }
    }
}

#[derive(Clone)]
pub struct Engine {
    pub(crate) store: Arc<dyn StoreBackend>,
    pub(crate) config: EngineConfig,
}

impl Engine {
    pub fn new(store: Arc<dyn StoreBackend>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
