// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `agentmesh-store` — key scheme and key-value store adapter.
//!
//! This crate is the only place that knows the on-disk key layout
//! ([`keys::ProjectKeys`]) and the only place that talks to the backing
//! store ([`backend::StoreBackend`]). `agentmesh-core` composes these two
//! primitives into the coordination engine; it never formats a key or
//! issues a raw store command itself.

pub mod backend;
pub mod error;
pub mod keys;
pub mod memory;
pub mod redis_backend;

pub use backend::{StoreBackend, StoreResult};
pub use error::StoreError;
pub use keys::ProjectKeys;
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
