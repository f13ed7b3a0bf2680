// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook input decoding.
//!
//! The host passes one JSON object on stdin. Unknown fields are ignored
//! (the host adds fields over time); missing required fields are a
//! decode error and the hook exits nonzero.

use crate::HookError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;

/// Session-start hook input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub session_id: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub transcript_path: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub plan_file: Option<String>,
}

/// Post-tool-use hook input.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatInput {
    pub session_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl HeartbeatInput {
    /// `tool_input.file_path` for file-editing tools.
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input.get("file_path").and_then(|v| v.as_str())
    }

    /// `tool_input.path` for tools that take one (e.g. directory reads).
    pub fn path(&self) -> Option<&str> {
        self.tool_input.get("path").and_then(|v| v.as_str())
    }
}

/// Pre-tool-use drain hook input.
#[derive(Debug, Clone, Deserialize)]
pub struct DrainInput {
    pub session_id: String,
}

/// Conflict-guard hook input.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardInput {
    pub session_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl GuardInput {
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input.get("file_path").and_then(|v| v.as_str())
    }
}

/// Session-end hook input.
#[derive(Debug, Clone, Deserialize)]
pub struct EndInput {
    pub session_id: String,
}

/// Decode a hook input object from a reader (stdin in production).
pub fn decode<T: DeserializeOwned>(reader: &mut impl Read) -> Result<T, HookError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
