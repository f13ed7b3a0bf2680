// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! troupe-hooks: the per-session hook agents.
//!
//! Each hook is a short-lived process the Claude Code runtime invokes
//! with a JSON blob on stdin: register on session start, heartbeat after
//! every tool call, inbox-drain (plus the conflict guard) before every
//! tool call, and end on session close. Hooks fail closed on identifier
//! validation (an id that doesn't validate never touches the
//! filesystem), and their stderr output is interface: the host surfaces
//! it to the model.

pub mod drain;
pub mod end;
pub mod guard;
pub mod heartbeat;
pub mod input;
pub mod register;
pub mod settings;
pub mod skip;

pub use input::{DrainInput, EndInput, GuardInput, HeartbeatInput, RegisterInput};
pub use skip::SkipRules;

use thiserror::Error;

/// Errors from hook execution. All of them exit the hook nonzero; none
/// of them are retried.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Ident(#[from] troupe_core::IdentError),

    #[error("bad hook input: {0}")]
    BadInput(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] troupe_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
