// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`RedisBackend`] — [`StoreBackend`] over `redis::aio::ConnectionManager`.
//!
//! `ConnectionManager` transparently reconnects on failure and is `Clone`,
//! so it is cheap to hand a fresh handle to every concurrent tool call
//! (same usage shape as `CacheService` in the broader corpus).

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::backend::{StoreBackend, StoreResult};
use crate::error::StoreError;

#[derive(Clone)]
pub struct RedisBackend {
    conn: redis::aio::ConnectionManager,
}

impl RedisBackend {
    /// Connect to `redis_url` (e.g. `redis://localhost:6379`).
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client =
            redis::Client::open(redis_url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn cmd_err(e: redis::RedisError) -> StoreError {
    StoreError::Command(e.to_string())
}

#[async_trait]
impl StoreBackend for RedisBackend {
    async fn str_get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(cmd_err)
    }

    async fn str_set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await.map_err(cmd_err)
    }

    async fn str_setex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex(key, value, ttl_secs).await.map_err(cmd_err)
    }

    async fn del(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.del(key).await.map_err(cmd_err)
    }

    async fn h_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.hget(key, field).await.map_err(cmd_err)
    }

    async fn h_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.hset(key, field, value).await.map_err(cmd_err)
    }

    async fn h_del(&self, key: &str, field: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.hdel(key, field).await.map_err(cmd_err)
    }

    async fn h_exists(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        conn.hexists(key, field).await.map_err(cmd_err)
    }

    async fn h_keys(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.hkeys(key).await.map_err(cmd_err)
    }

    async fn h_get_all(&self, key: &str) -> StoreResult<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let map: std::collections::HashMap<String, String> =
            conn.hgetall(key).await.map_err(cmd_err)?;
        Ok(map.into_iter().collect())
    }

    async fn r_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.rpush(key, value).await.map_err(cmd_err)
    }

    async fn l_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.lpush(key, value).await.map_err(cmd_err)
    }

    async fn l_range(&self, key: &str, start: isize, stop: isize) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.lrange(key, start, stop).await.map_err(cmd_err)
    }

    async fn l_rem_one(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.lrem(key, 1, value).await.map_err(cmd_err)
    }

    async fn l_trim_front(&self, key: &str, len: isize) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.ltrim(key, 0, len - 1).await.map_err(cmd_err)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.keys(pattern).await.map_err(cmd_err)
    }
}
