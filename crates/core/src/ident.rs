// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier validation.
//!
//! Every identifier that reaches the filesystem or a process launch goes
//! through one of these validators first. Nothing below this layer checks
//! again, so the rules here are the whole path-safety story: no path
//! separators, no `..`, no empty strings, tight character classes.

use thiserror::Error;

/// Length of the on-disk short session id.
pub const SHORT_ID_LEN: usize = 8;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentError {
    #[error("Invalid session_id")]
    InvalidSessionId,
    #[error("invalid id {0:?}: must match [A-Za-z0-9_-]+")]
    InvalidArtifactId(String),
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("invalid agent name {0:?}")]
    InvalidAgentName(String),
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Validate a full session id: `^[A-Za-z0-9_-]{8,64}$`.
///
/// Returns the validated input so callers can chain into
/// [`short_session_id`].
pub fn validate_session_id(id: &str) -> Result<&str, IdentError> {
    if id.len() < SHORT_ID_LEN || id.len() > 64 || !id.chars().all(is_ident_char) {
        return Err(IdentError::InvalidSessionId);
    }
    Ok(id)
}

/// Validate a session id and truncate it to the on-disk short form.
pub fn short_session_id(id: &str) -> Result<&str, IdentError> {
    let id = validate_session_id(id)?;
    Ok(&id[..SHORT_ID_LEN])
}

/// Validate a task/pipeline/team id: `^[A-Za-z0-9_-]+$`, no path separators.
pub fn validate_artifact_id(id: &str) -> Result<&str, IdentError> {
    if id.is_empty() || id.len() > 128 || !id.chars().all(is_ident_char) {
        return Err(IdentError::InvalidArtifactId(id.to_string()));
    }
    Ok(id)
}

/// Base model names accepted without configuration.
const MODEL_BASES: &[&str] = &["sonnet", "opus", "haiku"];

/// Validate a model name: a base alias (`sonnet`, `opus`, `haiku`) or a
/// dotted/dashed version variant of one (`opus-4.1`, `sonnet-4-5`).
pub fn validate_model(model: &str) -> Result<&str, IdentError> {
    for base in MODEL_BASES {
        if model == *base {
            return Ok(model);
        }
        if let Some(rest) = model.strip_prefix(base) {
            let Some(version) = rest.strip_prefix('-') else {
                continue;
            };
            if !version.is_empty()
                && version
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
            {
                return Ok(model);
            }
        }
    }
    Err(IdentError::UnknownModel(model.to_string()))
}

/// Validate an agent name's shape. Membership in the configured allowlist
/// is checked by the coordinator against its config; this gate only makes
/// the value safe to embed in paths and launch commands.
pub fn validate_agent_name(agent: &str) -> Result<&str, IdentError> {
    if agent.is_empty() || agent.len() > 64 || !agent.chars().all(is_ident_char) {
        return Err(IdentError::InvalidAgentName(agent.to_string()));
    }
    Ok(agent)
}

/// Whether a recorded tty path is safe to open and write to.
///
/// Matches `^/dev/(tty[s]?[0-9]+|pts/[0-9]+)$`. Anything else (symlink
/// tricks, arbitrary devices, relative paths) is refused and the caller
/// falls back to the inbox.
pub fn is_safe_tty(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("/dev/") else {
        return false;
    };
    if let Some(n) = rest.strip_prefix("pts/") {
        return !n.is_empty() && n.chars().all(|c| c.is_ascii_digit());
    }
    let Some(n) = rest.strip_prefix("tty") else {
        return false;
    };
    let n = n.strip_prefix('s').unwrap_or(n);
    !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "ident_tests.rs"]
mod tests;
