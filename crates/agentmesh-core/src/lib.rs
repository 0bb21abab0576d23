// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! The coordination engine: agent registry, heartbeat/liveness, file
//! locks, messaging, interface registry, todos, and the completion
//! signal, all composed over [`agentmesh_store::StoreBackend`].
//!
//! Every domain operation is an inherent method on [`Engine`], grouped
//! into sibling modules by concern. There is exactly one engine instance
//! per server process; it is cheaply `Clone`d into every tool handler and
//! into the heartbeat reaper task.

mod agents;
mod clock;
mod completion;
mod engine;
mod error;
mod heartbeat;
mod interfaces;
mod locks;
mod messaging;
mod todos;
pub mod types;

pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use interfaces::InterfaceQuery;
pub use locks::ReleaseOutcome;
pub use messaging::SendOutcome;
