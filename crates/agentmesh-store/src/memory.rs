// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`MemoryBackend`] — an in-process [`StoreBackend`] fake.
//!
//! No live Redis is available in this build/test environment, so the
//! entire coordination engine is tested against this fake instead. TTLs
//! are tracked but never expire on their own; tests that need expiry call
//! [`MemoryBackend::expire_now`] to simulate the passage of time.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::backend::{StoreBackend, StoreResult};

#[derive(Default)]
struct State {
    strings: HashMap<String, String>,
    expirations: HashMap<String, Instant>,
    hashes: HashMap<String, HashMap<String, String>>,
    lists: HashMap<String, Vec<String>>,
}

/// An in-memory [`StoreBackend`], for tests only.
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Force every key set with a TTL to appear expired, simulating the
    /// passage of time without an actual sleep.
    pub fn expire_now(&self) {
        let mut state = self.state.lock().unwrap();
        let keys: Vec<String> = state.expirations.keys().cloned().collect();
        for key in keys {
            state.strings.remove(&key);
            state.expirations.remove(&key);
        }
    }

    fn prune_expired(state: &mut State, key: &str) {
        if let Some(deadline) = state.expirations.get(key) {
            if Instant::now() >= *deadline {
                state.strings.remove(key);
                state.expirations.remove(key);
            }
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn str_get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut state = self.state.lock().unwrap();
        Self::prune_expired(&mut state, key);
        Ok(state.strings.get(key).cloned())
    }

    async fn str_set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.expirations.remove(key);
        state.strings.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn str_setex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.strings.insert(key.to_string(), value.to_string());
        state
            .expirations
            .insert(key.to_string(), Instant::now() + Duration::from_secs(ttl_secs));
        Ok(())
    }

    async fn del(&self, key: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.strings.remove(key);
        state.expirations.remove(key);
        state.hashes.remove(key);
        state.lists.remove(key);
        Ok(())
    }

    async fn h_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.hashes.get(key).and_then(|h| h.get(field).cloned()))
    }

    async fn h_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn h_del(&self, key: &str, field: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(h) = state.hashes.get_mut(key) {
            h.remove(field);
        }
        Ok(())
    }

    async fn h_exists(&self, key: &str, field: &str) -> StoreResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .hashes
            .get(key)
            .map(|h| h.contains_key(field))
            .unwrap_or(false))
    }

    async fn h_keys(&self, key: &str) -> StoreResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .hashes
            .get(key)
            .map(|h| h.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn h_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .hashes
            .get(key)
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn r_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn l_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .lists
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn l_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        let Some(list) = state.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(slice_redis_range(list, start, stop))
    }

    async fn l_rem_one(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(list) = state.lists.get_mut(key) {
            if let Some(pos) = list.iter().position(|v| v == value) {
                list.remove(pos);
            }
        }
        Ok(())
    }

    async fn l_trim_front(&self, key: &str, len: isize) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(list) = state.lists.get_mut(key) {
            let len = len.max(0) as usize;
            if list.len() > len {
                list.truncate(len);
            }
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        let matcher = GlobStar::new(pattern);
        Ok(state
            .strings
            .keys()
            .chain(state.hashes.keys())
            .chain(state.lists.keys())
            .filter(|k| matcher.matches(k))
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect())
    }
}

/// Redis-style `LRANGE`: negative indices count from the end, `stop` is
/// inclusive, both are clamped to the list bounds.
fn slice_redis_range(list: &[String], start: isize, stop: isize) -> Vec<String> {
    let len = list.len() as isize;
    if len == 0 {
        return Vec::new();
    }
    let norm = |i: isize| -> isize {
        if i < 0 {
            (len + i).max(0)
        } else {
            i.min(len - 1).max(0)
        }
    };
    let start = norm(start);
    let stop = norm(stop);
    if start > stop {
        return Vec::new();
    }
    list[start as usize..=stop as usize].to_vec()
}

/// Minimal glob matcher supporting only the single `*` wildcard, which is
/// all the key-scan patterns in this crate ever use (`project:*:agents`).
struct GlobStar<'a> {
    pattern: &'a str,
}

impl<'a> GlobStar<'a> {
    fn new(pattern: &'a str) -> Self {
        Self { pattern }
    }

    fn matches(&self, candidate: &str) -> bool {
        match self.pattern.split_once('*') {
            None => self.pattern == candidate,
            Some((prefix, suffix)) => {
                candidate.starts_with(prefix)
                    && candidate.ends_with(suffix)
                    && candidate.len() >= prefix.len() + suffix.len()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_roundtrip() {
        let be = MemoryBackend::new();
        be.str_set("k", "v").await.unwrap();
        assert_eq!(be.str_get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn setex_value_readable_until_expired() {
        let be = MemoryBackend::new();
        be.str_setex("k", 120, "v").await.unwrap();
        assert_eq!(be.str_get("k").await.unwrap(), Some("v".to_string()));
        be.expire_now();
        assert_eq!(be.str_get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hash_set_get_all() {
        let be = MemoryBackend::new();
        be.h_set("h", "a", "1").await.unwrap();
        be.h_set("h", "b", "2").await.unwrap();
        let mut all = be.h_get_all("h").await.unwrap();
        all.sort();
        assert_eq!(
            all,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn hash_del_removes_field_only() {
        let be = MemoryBackend::new();
        be.h_set("h", "a", "1").await.unwrap();
        be.h_set("h", "b", "2").await.unwrap();
        be.h_del("h", "a").await.unwrap();
        assert!(!be.h_exists("h", "a").await.unwrap());
        assert!(be.h_exists("h", "b").await.unwrap());
    }

    #[tokio::test]
    async fn list_push_and_range_preserves_order() {
        let be = MemoryBackend::new();
        be.r_push("l", "1").await.unwrap();
        be.r_push("l", "2").await.unwrap();
        be.r_push("l", "3").await.unwrap();
        let all = be.l_range("l", 0, -1).await.unwrap();
        assert_eq!(all, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn list_push_prepends_to_head() {
        let be = MemoryBackend::new();
        be.l_push("l", "1").await.unwrap();
        be.l_push("l", "2").await.unwrap();
        be.l_push("l", "3").await.unwrap();
        let all = be.l_range("l", 0, -1).await.unwrap();
        assert_eq!(all, vec!["3", "2", "1"]);
    }

    #[tokio::test]
    async fn list_rem_one_removes_single_occurrence() {
        let be = MemoryBackend::new();
        be.r_push("l", "a").await.unwrap();
        be.r_push("l", "b").await.unwrap();
        be.r_push("l", "a").await.unwrap();
        be.l_rem_one("l", "a").await.unwrap();
        let remaining = be.l_range("l", 0, -1).await.unwrap();
        assert_eq!(remaining, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn list_trim_front_keeps_bounded_length() {
        let be = MemoryBackend::new();
        for i in 0..150 {
            be.r_push("l", &i.to_string()).await.unwrap();
        }
        be.l_trim_front("l", 100).await.unwrap();
        let all = be.l_range("l", 0, -1).await.unwrap();
        assert_eq!(all.len(), 100);
        assert_eq!(all[0], "0");
    }

    #[tokio::test]
    async fn del_clears_all_representations() {
        let be = MemoryBackend::new();
        be.str_set("k", "v").await.unwrap();
        be.h_set("k", "f", "v").await.unwrap();
        be.r_push("k", "v").await.unwrap();
        be.del("k").await.unwrap();
        assert_eq!(be.str_get("k").await.unwrap(), None);
        assert!(be.h_get_all("k").await.unwrap().is_empty());
        assert!(be.l_range("k", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keys_glob_matches_project_agents_pattern() {
        let be = MemoryBackend::new();
        be.h_set("project:p1:agents", "s-1", "{}").await.unwrap();
        be.h_set("project:p2:agents", "s-2", "{}").await.unwrap();
        be.h_set("project:p1:interfaces", "X", "{}").await.unwrap();
        let mut found = be.keys("project:*:agents").await.unwrap();
        found.sort();
        assert_eq!(found, vec!["project:p1:agents", "project:p2:agents"]);
    }

    #[test]
    fn glob_star_matches_prefix_and_suffix() {
        let g = GlobStar::new("project:*:agents");
        assert!(g.matches("project:p1:agents"));
        assert!(!g.matches("project:p1:messages"));
        assert!(!g.matches("proj:p1:agents"));
    }
}
