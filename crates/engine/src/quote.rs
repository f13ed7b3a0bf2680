// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell quoting for launch commands.
//!
//! Every dynamic value embedded in a launch command goes through
//! [`single_quote`] after validation. Inside single quotes the shell
//! interprets nothing, so the quoted form is a literal regardless of
//! content; embedded single quotes use the `'\''` splice.

/// Quote a string as a single POSIX shell word.
pub fn single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Quote a string as a PowerShell single-quoted literal.
///
/// PowerShell single quotes interpret nothing; an embedded quote is
/// doubled.
pub fn powershell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
