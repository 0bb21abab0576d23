// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;

/// Runtime configuration for the coordination server.
///
/// Every field is sourced from an environment variable; there is no
/// config-file layer. A single server process coordinates every agent
/// working on a project, so the knobs that matter are the store connection,
/// the liveness timeouts, and where completion signals land on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Redis connection URL (`REDIS_URL`, default `redis://localhost:6379`).
    pub redis_url: String,
    /// Heartbeat TTL in seconds (`HEARTBEAT_TIMEOUT`, default 120). An agent
    /// that misses this window is reaped by the heartbeat sweep.
    pub heartbeat_timeout_secs: u64,
    /// File lock TTL in seconds (`AGENTMESH_LOCK_TTL`, default 300).
    pub lock_ttl_secs: u64,
    /// Directory completion-signal drop-files are written to
    /// (`AGENTMESH_COMPLETION_DIR`, default `/tmp/splitmind-status` — kept
    /// for behavioral compatibility with existing deployments).
    pub completion_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive string
    /// (`AGENTMESH_LOG`, falling back to `RUST_LOG`, default `info`).
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".into(),
            heartbeat_timeout_secs: 120,
            lock_ttl_secs: 300,
            completion_dir: PathBuf::from("/tmp/splitmind-status"),
            log_filter: "info".into(),
        }
    }
}
