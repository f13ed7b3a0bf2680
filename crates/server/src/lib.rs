// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! troupe-server: the coordinator.
//!
//! An MCP server over stdio: JSON-RPC 2.0, line-delimited, one request
//! at a time. Every `coord_*` tool validates its arguments, performs a
//! bounded sequence of state-store operations, and returns; nothing
//! holds a lock across requests and nothing survives a restart except
//! the files. The `trouped` binary wires this to stdin/stdout with file
//! logging (stdout belongs to the protocol).

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{CoordError, ErrorKind};
pub use server::{Ctx, Server};
