// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

use crate::types::FileLock;

/// Error kinds surfaced to MCP callers — never as a transport-level error,
/// always as a field inside the JSON result (see `agentmesh-tools`).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("file already locked by another session")]
    Conflict(Box<FileLock>),

    #[error("lock not owned by this session")]
    NotOwner,

    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    #[error("query timed out")]
    Timeout,

    #[error("store error: {0}")]
    Store(#[from] agentmesh_store::StoreError),

    #[error("malformed record in store: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
