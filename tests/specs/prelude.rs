//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for driving the troupe binary against an
//! isolated state root.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// Aggressive timings for fast, deterministic tests.
const TROUPE_HEARTBEAT_FLUSH_MS: &str = "0";
const TROUPE_LOCK_TIMEOUT_MS: &str = "5000";

/// Returns the path to a binary, checking llvm-cov target directory
/// first, then the standard target dir, then relative to the test
/// binary itself (shared target dirs).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn troupe_binary() -> PathBuf {
    binary_path("troupe")
}

/// An isolated state root plus the fluent command builder.
pub struct World {
    state_dir: tempfile::TempDir,
}

impl World {
    pub fn new() -> Self {
        Self {
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// The `terminals/` dir of this world's state root.
    pub fn terminals(&self) -> PathBuf {
        self.state_path().join("terminals")
    }

    pub fn troupe(&self) -> CliBuilder {
        CliBuilder {
            args: Vec::new(),
            stdin: None,
            envs: vec![
                (
                    "TROUPE_STATE_DIR".into(),
                    self.state_path().to_string_lossy().into_owned(),
                ),
                (
                    "TROUPE_HEARTBEAT_FLUSH_MS".into(),
                    TROUPE_HEARTBEAT_FLUSH_MS.into(),
                ),
                (
                    "TROUPE_LOCK_TIMEOUT_MS".into(),
                    TROUPE_LOCK_TIMEOUT_MS.into(),
                ),
                ("TROUPE_TEST_HEADLESS".into(), "1".into()),
            ],
        }
    }

    /// Register a session through the real hook.
    pub fn register(&self, session_id: &str, cwd: &Path) {
        self.troupe()
            .args(&["hook", "register"])
            .stdin(&format!(
                r#"{{"session_id": "{}", "cwd": "{}"}}"#,
                session_id,
                cwd.display()
            ))
            .passes();
    }

    /// Fire one heartbeat through the real hook.
    pub fn heartbeat(&self, session_id: &str, tool: &str, file: Option<&str>) {
        let tool_input = match file {
            Some(f) => format!(r#"{{"file_path": "{f}"}}"#),
            None => "{}".to_string(),
        };
        self.troupe()
            .args(&["hook", "heartbeat"])
            .stdin(&format!(
                r#"{{"session_id": "{session_id}", "tool_name": "{tool}", "tool_input": {tool_input}}}"#
            ))
            .passes();
    }

    pub fn session_record(&self, short_id: &str) -> serde_json::Value {
        let path = self.terminals().join(format!("session-{short_id}.json"));
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    pub fn inbox_path(&self, short_id: &str) -> PathBuf {
        self.terminals().join(format!("inbox/{short_id}.jsonl"))
    }

    pub fn results_file(&self, name: &str) -> PathBuf {
        self.terminals().join("results").join(name)
    }
}

/// Fluent CLI builder.
pub struct CliBuilder {
    args: Vec<String>,
    stdin: Option<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn output(self) -> Output {
        let mut cmd = Command::new(troupe_binary());
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().expect("troupe binary should spawn");
        if let Some(input) = &self.stdin {
            child
                .stdin
                .as_mut()
                .unwrap()
                .write_all(input.as_bytes())
                .unwrap();
        }
        drop(child.stdin.take());
        child.wait_with_output().expect("troupe should run")
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.output();
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.output();
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run without asserting on the exit code (for race harnesses).
    pub fn spawn_concurrent(self) -> std::process::Child {
        let mut cmd = Command::new(troupe_binary());
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let mut child = cmd.spawn().expect("troupe binary should spawn");
        if let Some(input) = &self.stdin {
            child
                .stdin
                .as_mut()
                .unwrap()
                .write_all(input.as_bytes())
                .unwrap();
        }
        drop(child.stdin.take());
        child
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    /// Prefer this for format specs.
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Assert stderr equals expected exactly (with diff on failure).
    pub fn stderr_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stderr(), expected);
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            !stderr.contains(unexpected),
            "stderr should not contain '{}'\nstderr: {}",
            unexpected,
            stderr
        );
        self
    }
}
