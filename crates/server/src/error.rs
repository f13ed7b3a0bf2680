// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured coordinator errors.
//!
//! Every tool failure is reported with a machine-readable kind and a
//! human message; the kind tells the caller whether to fix the call
//! (`invalid_argument`), retry (`transient_io`), or accept a degraded
//! outcome (`wake_failed_fell_back`).

use serde::Serialize;
use thiserror::Error;

/// Error kinds surfaced through tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    RateLimited,
    Conflict,
    SpawnFailed,
    WakeFailedFellBack,
    TransientIo,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Conflict => "conflict",
            ErrorKind::SpawnFailed => "spawn_failed",
            ErrorKind::WakeFailedFellBack => "wake_failed_fell_back",
            ErrorKind::TransientIo => "transient_io",
        }
    }
}

/// A coordinator error: kind plus message.
#[derive(Debug, Error)]
#[error("{}: {message}", kind.as_str())]
pub struct CoordError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CoordError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }
}

impl From<troupe_core::IdentError> for CoordError {
    fn from(e: troupe_core::IdentError) -> Self {
        CoordError::invalid(e.to_string())
    }
}

impl From<troupe_store::StoreError> for CoordError {
    fn from(e: troupe_store::StoreError) -> Self {
        CoordError::new(ErrorKind::TransientIo, e.to_string())
    }
}

impl From<troupe_engine::EngineError> for CoordError {
    fn from(e: troupe_engine::EngineError) -> Self {
        use troupe_engine::EngineError;
        let kind = match &e {
            EngineError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::SpawnFailed(_) | EngineError::Adapter(_) => ErrorKind::SpawnFailed,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Store(_) => ErrorKind::TransientIo,
        };
        CoordError::new(kind, e.to_string())
    }
}
