// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guard skip rules.
//!
//! `TROUPE_GUARD_SKIP_RULES` enumerates policy guards to bypass,
//! comma-separated. The allowed set is closed; anything else is ignored
//! with a stderr warning. The default is fail-closed: no rules skipped.

/// Parsed skip rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipRules {
    /// Skip the cross-session edit-conflict warning.
    pub conflict: bool,
    /// Skip the stale-transition write when listing sessions.
    pub stale: bool,
}

impl SkipRules {
    /// Parse a rule list, warning about unknown entries on `warn`.
    pub fn parse(value: &str, warn: &mut impl std::io::Write) -> Self {
        let mut rules = SkipRules::default();
        for entry in value.split(',') {
            let entry = entry.trim();
            match entry {
                "" => {}
                "conflict" => rules.conflict = true,
                "stale" => rules.stale = true,
                other => {
                    let _ = writeln!(warn, "troupe: ignoring unknown skip rule {other:?}");
                }
            }
        }
        rules
    }

    /// Read rules from `TROUPE_GUARD_SKIP_RULES`.
    pub fn from_env() -> Self {
        match std::env::var("TROUPE_GUARD_SKIP_RULES") {
            Ok(value) => Self::parse(&value, &mut std::io::stderr()),
            Err(_) => SkipRules::default(),
        }
    }
}
