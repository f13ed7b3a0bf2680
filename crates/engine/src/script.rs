// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker launch-script construction.
//!
//! The script is a single shell command line built from quoted
//! literals: POSIX `sh` on unix, PowerShell on Windows (cmd.exe cannot
//! express the pid/trailer discipline). The only dynamic values are the
//! working directory, the artifact paths (derived from the validated
//! task id), the model, the agent name, and for interactive workers the
//! generated session id and settings path; each is validated upstream
//! and quoted here. The prompt itself never appears in the command:
//! pipe workers read it from stdin redirection, interactive workers via
//! a read of the prompt file.
//!
//! Script obligations, in order: record own pid before the model binary
//! runs, run the model with output captured, then the exit trailer:
//! write the done marker atomically and remove the pid file regardless
//! of the model's exit status.

use crate::quote::{powershell_quote, single_quote};
use std::path::Path;
use troupe_core::WorkerMode;
use troupe_store::results::ResultPaths;

/// Inputs to script construction, all pre-validated.
pub struct ScriptSpec<'a> {
    pub task_id: &'a str,
    pub directory: &'a Path,
    pub command: &'a str,
    pub model: &'a str,
    pub agent: Option<&'a str>,
    pub mode: WorkerMode,
    /// Interactive only: the `--session-id` handed to the child.
    pub session_id: Option<&'a str>,
    /// Interactive only: generated hook settings file.
    pub settings_path: Option<&'a Path>,
}

/// Build the launch script for this platform's shell.
pub fn build(spec: &ScriptSpec<'_>, paths: &ResultPaths) -> String {
    #[cfg(unix)]
    {
        build_posix(spec, paths)
    }
    #[cfg(not(unix))]
    {
        build_windows(spec, paths)
    }
}

/// POSIX `sh` variant, run via `sh -c`.
pub fn build_posix(spec: &ScriptSpec<'_>, paths: &ResultPaths) -> String {
    let dir = single_quote(&spec.directory.display().to_string());
    let pid = single_quote(&paths.pid.display().to_string());
    let prompt = single_quote(&paths.prompt.display().to_string());
    let output = single_quote(&paths.output.display().to_string());
    let done = single_quote(&paths.done.display().to_string());
    let done_tmp = single_quote(&format!("{}.tmp", paths.done.display()));

    let invocation = match spec.mode {
        WorkerMode::Pipe => format!("{} < {} > {} 2>&1", posix_model_command(spec), prompt, output),
        WorkerMode::Interactive => {
            format!("{} \"$(cat {})\"", posix_model_command(spec), prompt)
        }
    };

    // The subordinate must not be mistaken for its parent session.
    let scrub = "unset CLAUDECODE CLAUDE_CODE_SESSION_ID";

    format!(
        "{scrub}; cd {dir} || exit 1; echo $$ > {pid}; {invocation}; st=$?; \
         if [ \"$st\" -eq 0 ]; then s=completed; else s=failed; fi; \
         printf '{{\"status\":\"%s\",\"finished\":%s,\"task_id\":\"{task_id}\",\"exit_code\":%s}}' \
         \"$s\" \"$(date +%s)\" \"$st\" > {done_tmp}; mv {done_tmp} {done}; rm -f {pid}",
        task_id = spec.task_id,
    )
}

fn posix_model_command(spec: &ScriptSpec<'_>) -> String {
    let mut cmd = format!(
        "{} --model {}",
        single_quote(spec.command),
        single_quote(spec.model)
    );
    if let Some(agent) = spec.agent {
        cmd.push_str(&format!(" --agent {}", single_quote(agent)));
    }
    match spec.mode {
        WorkerMode::Pipe => cmd.push_str(" -p"),
        WorkerMode::Interactive => {
            if let Some(session_id) = spec.session_id {
                cmd.push_str(&format!(" --session-id {}", single_quote(session_id)));
            }
            if let Some(settings) = spec.settings_path {
                cmd.push_str(&format!(
                    " --settings {}",
                    single_quote(&settings.display().to_string())
                ));
            }
        }
    }
    cmd
}

/// PowerShell variant, run via `powershell -NoProfile -Command`. Same
/// obligations as the POSIX script: `$PID` before the model binary,
/// `$LASTEXITCODE` into the trailer, `Move-Item` for the atomic done
/// marker, pid file removed either way.
pub fn build_windows(spec: &ScriptSpec<'_>, paths: &ResultPaths) -> String {
    let dir = powershell_quote(&spec.directory.display().to_string());
    let pid = powershell_quote(&paths.pid.display().to_string());
    let prompt = powershell_quote(&paths.prompt.display().to_string());
    let output = powershell_quote(&paths.output.display().to_string());
    let done = powershell_quote(&paths.done.display().to_string());
    let done_tmp = powershell_quote(&format!("{}.tmp", paths.done.display()));

    let invocation = match spec.mode {
        WorkerMode::Pipe => format!(
            "Get-Content -Raw -LiteralPath {prompt} | {} *> {output}",
            windows_model_command(spec)
        ),
        WorkerMode::Interactive => format!(
            "{} (Get-Content -Raw -LiteralPath {prompt})",
            windows_model_command(spec)
        ),
    };

    let scrub =
        "Remove-Item Env:CLAUDECODE, Env:CLAUDE_CODE_SESSION_ID -ErrorAction SilentlyContinue";

    format!(
        "{scrub}; Set-Location -LiteralPath {dir}; \
         $PID | Out-File -LiteralPath {pid} -Encoding ascii; \
         {invocation}; \
         $code = $LASTEXITCODE; if ($null -eq $code) {{ $code = 127 }}; \
         $status = if ($code -eq 0) {{ 'completed' }} else {{ 'failed' }}; \
         $finished = [DateTimeOffset]::UtcNow.ToUnixTimeSeconds(); \
         Set-Content -LiteralPath {done_tmp} -Value \
         ('{{\"status\":\"' + $status + '\",\"finished\":' + $finished + \
         ',\"task_id\":\"{task_id}\",\"exit_code\":' + $code + '}}'); \
         Move-Item -Force -LiteralPath {done_tmp} -Destination {done}; \
         Remove-Item -Force -LiteralPath {pid}",
        task_id = spec.task_id,
    )
}

fn windows_model_command(spec: &ScriptSpec<'_>) -> String {
    let mut cmd = format!(
        "& {} --model {}",
        powershell_quote(spec.command),
        powershell_quote(spec.model)
    );
    if let Some(agent) = spec.agent {
        cmd.push_str(&format!(" --agent {}", powershell_quote(agent)));
    }
    match spec.mode {
        WorkerMode::Pipe => cmd.push_str(" -p"),
        WorkerMode::Interactive => {
            if let Some(session_id) = spec.session_id {
                cmd.push_str(&format!(" --session-id {}", powershell_quote(session_id)));
            }
            if let Some(settings) = spec.settings_path {
                cmd.push_str(&format!(
                    " --settings {}",
                    powershell_quote(&settings.display().to_string())
                ));
            }
        }
    }
    cmd
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
