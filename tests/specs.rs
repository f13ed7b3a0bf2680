//! Behavioral specifications for the troupe CLI.
//!
//! These tests are black-box: they invoke the troupe binary against an
//! isolated state root and verify stdout, stderr, exit codes, and the
//! on-disk contract.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// hooks/
#[path = "specs/hooks/drain.rs"]
mod hooks_drain;
#[path = "specs/hooks/heartbeat_races.rs"]
mod hooks_heartbeat_races;
#[path = "specs/hooks/register.rs"]
mod hooks_register;

// cli/
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/send.rs"]
mod cli_send;
#[path = "specs/cli/status.rs"]
mod cli_status;
