// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use anyhow::Context;
use tracing::debug;

use crate::Config;

/// Load configuration from the process environment.
///
/// Every field falls back to its [`Config::default`] value when the
/// corresponding environment variable is unset; a value that is set but
/// fails to parse (e.g. `HEARTBEAT_TIMEOUT=abc`) is a hard error rather than
/// a silent fallback, since that almost always indicates a typo in the
/// deployment's environment.
pub fn load() -> anyhow::Result<Config> {
    from_env(|key| std::env::var(key).ok())
}

/// Core of [`load`], parameterized over an environment lookup so tests don't
/// need to mutate process-wide environment state.
fn from_env(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let defaults = Config::default();

    let redis_url = get("REDIS_URL").unwrap_or(defaults.redis_url);
    debug!(redis_url = %redis_url, "resolved store connection");

    let heartbeat_timeout_secs = match get("HEARTBEAT_TIMEOUT") {
        Some(v) => v
            .parse()
            .with_context(|| format!("HEARTBEAT_TIMEOUT={v:?} is not a valid number of seconds"))?,
        None => defaults.heartbeat_timeout_secs,
    };

    let lock_ttl_secs = match get("AGENTMESH_LOCK_TTL") {
        Some(v) => v
            .parse()
            .with_context(|| format!("AGENTMESH_LOCK_TTL={v:?} is not a valid number of seconds"))?,
        None => defaults.lock_ttl_secs,
    };

    let completion_dir = get("AGENTMESH_COMPLETION_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or(defaults.completion_dir);

    let log_filter = get("AGENTMESH_LOG")
        .or_else(|| get("RUST_LOG"))
        .unwrap_or(defaults.log_filter);

    Ok(Config {
        redis_url,
        heartbeat_timeout_secs,
        lock_ttl_secs,
        completion_dir,
        log_filter,
    })
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_all_defaults() {
        let cfg = from_env(env(&[])).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn redis_url_is_read_from_env() {
        let cfg = from_env(env(&[("REDIS_URL", "redis://cache:6380")])).unwrap();
        assert_eq!(cfg.redis_url, "redis://cache:6380");
    }

    #[test]
    fn heartbeat_timeout_is_parsed() {
        let cfg = from_env(env(&[("HEARTBEAT_TIMEOUT", "45")])).unwrap();
        assert_eq!(cfg.heartbeat_timeout_secs, 45);
    }

    #[test]
    fn invalid_heartbeat_timeout_is_an_error() {
        let result = from_env(env(&[("HEARTBEAT_TIMEOUT", "not-a-number")]));
        assert!(result.is_err());
    }

    #[test]
    fn lock_ttl_is_read_from_env() {
        let cfg = from_env(env(&[("AGENTMESH_LOCK_TTL", "60")])).unwrap();
        assert_eq!(cfg.lock_ttl_secs, 60);
    }

    #[test]
    fn completion_dir_is_read_from_env() {
        let cfg = from_env(env(&[("AGENTMESH_COMPLETION_DIR", "/var/run/agentmesh")])).unwrap();
        assert_eq!(cfg.completion_dir, std::path::PathBuf::from("/var/run/agentmesh"));
    }

    #[test]
    fn agentmesh_log_takes_priority_over_rust_log() {
        let cfg = from_env(env(&[("AGENTMESH_LOG", "debug"), ("RUST_LOG", "warn")])).unwrap();
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn falls_back_to_rust_log_when_agentmesh_log_unset() {
        let cfg = from_env(env(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(cfg.log_filter, "warn");
    }
}
