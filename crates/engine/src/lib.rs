// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! troupe-engine: the worker and pipeline supervisor.
//!
//! Spawns subordinate Claude sessions as child processes, pipe mode
//! (fire-and-forget) or interactive (hooked, addressable), tracks them
//! through their pid files, and observes completion through done
//! markers. The supervisor never waits on a child synchronously; the
//! pipeline driver is the one place that polls, and it runs on its own
//! task.

pub mod kill;
pub mod pipeline;
pub mod quote;
pub mod result;
pub mod script;
pub mod spawn;
pub mod worktree;

pub use kill::kill_worker;
pub use result::{probe_status, worker_report, WorkerReport};
pub use spawn::{spawn_worker, SpawnOutcome, SpawnRequest};

use thiserror::Error;

/// Errors from supervisor operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] troupe_store::StoreError),

    #[error(transparent)]
    Adapter(#[from] troupe_adapters::AdapterError),
}

impl From<troupe_core::IdentError> for EngineError {
    fn from(e: troupe_core::IdentError) -> Self {
        EngineError::InvalidArgument(e.to_string())
    }
}
