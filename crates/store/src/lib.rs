// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! troupe-store: the filesystem state protocol.
//!
//! All coordination state lives in small files under the state root; this
//! crate owns the layout and the only four primitives anything uses to
//! touch it: atomic whole-file writes, lock-protected appends,
//! lock-protected read-modify-write, and best-effort JSON reads. There is
//! no daemon state anywhere, so a crashed coordinator loses nothing.

pub mod activity;
pub mod config;
pub mod env;
pub mod fs;
pub mod inbox;
pub mod lock;
pub mod paths;
pub mod rate_limit;
pub mod results;
pub mod sessions;
pub mod tasks;
pub mod teams;

pub use config::Config;
pub use paths::StateRoot;

use thiserror::Error;

/// Errors from state-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lock timeout on {0}")]
    LockTimeout(String),

    #[error("JSON error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("state root is not usable: {0}")]
    BadRoot(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether a retry might succeed (lock contention, transient IO).
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::LockTimeout(_) | StoreError::Io { .. })
    }
}
