// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Team records.

use serde::{Deserialize, Serialize};

/// `teams/<name>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    #[serde(default)]
    pub project: String,
    /// Member session ids, deduplicated, insertion-ordered.
    #[serde(default)]
    pub members: Vec<String>,
    pub created: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TeamRecord {
    pub fn new(name: &str, project: &str, now: u64) -> Self {
        Self {
            name: name.to_string(),
            project: project.to_string(),
            members: Vec::new(),
            created: now,
            extra: serde_json::Map::new(),
        }
    }

    /// Add a member; returns false if already present.
    pub fn add_member(&mut self, session: &str) -> bool {
        if self.members.iter().any(|m| m == session) {
            return false;
        }
        self.members.push(session.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_member_dedups() {
        let mut team = TeamRecord::new("backend", "proj", 1);
        assert!(team.add_member("a1b2c3d4"));
        assert!(team.add_member("e5f6g7h8"));
        assert!(!team.add_member("a1b2c3d4"));
        assert_eq!(team.members, vec!["a1b2c3d4", "e5f6g7h8"]);
    }
}
