// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`StoreBackend`] — the capability every domain operation is composed
//! from. Keeping this a trait (rather than calling `redis` directly from
//! `agentmesh-core`) mirrors `sven-tools`'s separation from `sven-model`:
//! the domain crate never needs to know which key-value store backs it,
//! and tests can run against [`crate::memory::MemoryBackend`] without a
//! live Redis.
//!
//! Every method here is individually atomic against the underlying store;
//! no multi-key transaction primitive is exposed, by design (see the
//! cascade-cleanup ordering discussion in `agentmesh-core`).

use async_trait::async_trait;

use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait StoreBackend: Send + Sync {
    // ── strings ──────────────────────────────────────────────────────────
    async fn str_get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn str_set(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn str_setex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()>;
    async fn del(&self, key: &str) -> StoreResult<()>;

    // ── hashes ───────────────────────────────────────────────────────────
    async fn h_get(&self, key: &str, field: &str) -> StoreResult<Option<String>>;
    async fn h_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;
    async fn h_del(&self, key: &str, field: &str) -> StoreResult<()>;
    async fn h_exists(&self, key: &str, field: &str) -> StoreResult<bool>;
    async fn h_keys(&self, key: &str) -> StoreResult<Vec<String>>;
    async fn h_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>>;

    // ── lists ────────────────────────────────────────────────────────────
    async fn r_push(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Prepends `value` so it becomes the new head of the list (LPUSH).
    async fn l_push(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn l_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>>;
    /// Removes up to one occurrence of `value` from the list (positional,
    /// by value — LREM key 1 value).
    async fn l_rem_one(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Keeps only the first `len` elements (LTRIM key 0 len-1).
    async fn l_trim_front(&self, key: &str, len: isize) -> StoreResult<()>;

    // ── key scan ─────────────────────────────────────────────────────────
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;
}
