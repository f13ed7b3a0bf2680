// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! troupe-adapters: platform adapters.
//!
//! Everything that touches a terminal emulator, a scripting bridge, or a
//! process table lives here: opening panes, delivering the wake
//! keystroke, spawning detached children, and killing process trees.
//! Every external call is bounded by a wall-clock timeout.

pub mod env;
pub mod process;
pub mod subprocess;
pub mod terminal;
pub mod wake;

pub use terminal::{open_terminal, Layout};
pub use wake::wake_session;

use thiserror::Error;

/// Errors from platform adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("launch failed: {0}")]
    LaunchFailed(String),

    #[error("wake failed: {0}")]
    WakeFailed(String),

    #[error("command failed: {0}")]
    CommandFailed(String),
}
