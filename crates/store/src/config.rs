// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator configuration.
//!
//! Loaded from `<root>/terminals/config.toml` when present; every field
//! has a default. The allowlists extend (not replace) the built-in model
//! grammar and agent set.

use crate::{StateRoot, StoreError};
use serde::Deserialize;

/// Agent names accepted without configuration.
pub const DEFAULT_AGENTS: &[&str] = &["general", "reviewer", "tester"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub limits: Limits,
    pub spawn: Spawn,
    pub wake: Wake,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Maximum inbox message content length, chars.
    pub message_max_len: usize,
    /// Sends admitted per (sender, recipient) per window.
    pub rate_limit_max: u32,
    pub rate_limit_window_ms: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            message_max_len: 4000,
            rate_limit_max: 10,
            rate_limit_window_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Spawn {
    /// Model binary launched for workers.
    pub command: String,
    pub default_model: String,
    /// Extra agent names beyond [`DEFAULT_AGENTS`].
    pub agents: Vec<String>,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            default_model: "sonnet".to_string(),
            agents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Wake {
    /// Wall-clock bound on scripting-bridge wake attempts.
    pub timeout_ms: u64,
}

impl Default for Wake {
    fn default() -> Self {
        Self { timeout_ms: 8000 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            spawn: Spawn::default(),
            wake: Wake::default(),
        }
    }
}

impl Config {
    /// Load from the state root. An absent file means defaults; a
    /// malformed file is an error, not a silent fallback to defaults.
    pub fn load(root: &StateRoot) -> Result<Self, StoreError> {
        let path = root.config_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        toml::from_str(&content).map_err(|e| StoreError::BadRoot(format!("config.toml: {e}")))
    }

    /// Whether an agent name is allowed (built-in set plus config).
    pub fn agent_allowed(&self, agent: &str) -> bool {
        DEFAULT_AGENTS.contains(&agent) || self.spawn.agents.iter().any(|a| a == agent)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
