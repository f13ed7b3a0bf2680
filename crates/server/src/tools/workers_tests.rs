// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use troupe_core::{WorkerMeta, WorkerStatus};
use troupe_store::{Config, StateRoot};

fn ctx() -> (tempfile::TempDir, Ctx, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let root = StateRoot::open(tmp.path()).unwrap();
    let work = tempfile::tempdir().unwrap();

    let stub = work.path().join("fakeclaude");
    std::fs::write(&stub, "#!/bin/sh\ncat\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let mut config = Config::load(&root).unwrap();
    config.spawn.command = stub.display().to_string();
    (tmp, Ctx::new(root, config), work)
}

#[tokio::test]
async fn spawn_worker_returns_task_id_and_backend() {
    let (_tmp, ctx, work) = ctx();
    let out = spawn(
        &ctx,
        SpawnWorkerArgs {
            directory: work.path().display().to_string(),
            prompt: "do the thing".into(),
            model: None,
            agent: None,
            task_id: Some("t1".into()),
            mode: None,
            isolate: false,
            notify_session_id: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(out["task_id"], "t1");
    assert_eq!(out["backend"], "background");
    assert!(results::read_meta(&ctx.root, "t1").unwrap().is_some());
}

#[tokio::test]
async fn spawn_worker_truncates_notify_to_short_id() {
    let (_tmp, ctx, work) = ctx();
    spawn(
        &ctx,
        SpawnWorkerArgs {
            directory: work.path().display().to_string(),
            prompt: "p".into(),
            model: None,
            agent: None,
            task_id: Some("t1".into()),
            mode: None,
            isolate: false,
            notify_session_id: Some("a1b2c3d4e5f6g7h8".into()),
        },
    )
    .await
    .unwrap();

    let meta = results::read_meta(&ctx.root, "t1").unwrap().unwrap();
    assert_eq!(meta.notify_session_id.as_deref(), Some("a1b2c3d4"));
}

#[tokio::test]
async fn spawn_worker_rejects_unknown_mode() {
    let (_tmp, ctx, work) = ctx();
    let err = spawn(
        &ctx,
        SpawnWorkerArgs {
            directory: work.path().display().to_string(),
            prompt: "p".into(),
            model: None,
            agent: None,
            task_id: None,
            mode: Some("daemon".into()),
            isolate: false,
            notify_session_id: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn get_result_reports_unknown_worker_as_not_found() {
    let (_tmp, ctx, _work) = ctx();
    let err = get_result(
        &ctx,
        GetResultArgs {
            task_id: "ghost".into(),
            tail_lines: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[test]
fn get_result_tails_completed_worker() {
    let (_tmp, ctx, _work) = ctx();
    let meta = WorkerMeta::new("t1", "/tmp/w", "p", "sonnet", 1);
    results::write_meta(&ctx.root, &meta).unwrap();
    troupe_store::fs::safe_write_json(
        &results::paths(&ctx.root, "t1").done,
        &troupe_core::WorkerDone {
            status: WorkerStatus::Completed,
            finished: 2,
            task_id: "t1".into(),
            exit_code: Some(0),
        },
    )
    .unwrap();
    std::fs::write(results::paths(&ctx.root, "t1").output, "a\nb\nc\n").unwrap();

    let out = get_result(
        &ctx,
        GetResultArgs {
            task_id: "t1".into(),
            tail_lines: Some(2),
        },
    )
    .unwrap();
    assert_eq!(out["status"], "completed");
    assert_eq!(out["tail"], "b\nc");
}

#[test]
fn kill_missing_worker_is_not_found() {
    let (_tmp, ctx, _work) = ctx();
    let err = kill(
        &ctx,
        KillArgs {
            task_id: "ghost".into(),
        },
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn directive_to_pipe_worker_is_refused() {
    let (_tmp, ctx, work) = ctx();
    spawn(
        &ctx,
        SpawnWorkerArgs {
            directory: work.path().display().to_string(),
            prompt: "p".into(),
            model: None,
            agent: None,
            task_id: Some("t1".into()),
            mode: Some("pipe".into()),
            isolate: false,
            notify_session_id: None,
        },
    )
    .await
    .unwrap();

    let err = send_directive(
        &ctx,
        DirectiveArgs {
            worker_id: "t1".into(),
            content: "change course".into(),
            priority: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
#[serial]
async fn directive_lands_in_the_worker_inbox() {
    std::env::set_var("TROUPE_TEST_HEADLESS", "1");
    let (_tmp, ctx, work) = ctx();
    let out = spawn(
        &ctx,
        SpawnWorkerArgs {
            directory: work.path().display().to_string(),
            prompt: "p".into(),
            model: None,
            agent: None,
            task_id: Some("t2".into()),
            mode: Some("interactive".into()),
            isolate: false,
            notify_session_id: None,
        },
    )
    .await
    .unwrap();
    let session = out["session_id"].as_str().unwrap().to_string();

    let delivered = send_directive(
        &ctx,
        DirectiveArgs {
            worker_id: "t2".into(),
            content: "focus on the parser".into(),
            priority: Some("urgent".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(delivered["delivered"], true);
    assert_eq!(delivered["session_id"], session.as_str());

    let queued = inbox::peek(&ctx.root, &session).unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].content, "focus on the parser");
    assert_eq!(queued[0].priority, Priority::Urgent);
    std::env::remove_var("TROUPE_TEST_HEADLESS");
}

#[tokio::test]
async fn directive_to_unknown_worker_is_not_found() {
    let (_tmp, ctx, _work) = ctx();
    let err = send_directive(
        &ctx,
        DirectiveArgs {
            worker_id: "ghost".into(),
            content: "x".into(),
            priority: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[serial]
async fn spawn_terminal_honors_headless_mode() {
    std::env::set_var("TROUPE_TEST_HEADLESS", "1");
    let (_tmp, ctx, work) = ctx();
    let out = spawn_terminal(
        &ctx,
        SpawnTerminalArgs {
            directory: work.path().display().to_string(),
            layout: Some("split".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(out["backend"], "background");
    std::env::remove_var("TROUPE_TEST_HEADLESS");
}

#[tokio::test]
async fn spawn_terminal_rejects_missing_directory() {
    let (_tmp, ctx, _work) = ctx();
    let err = spawn_terminal(
        &ctx,
        SpawnTerminalArgs {
            directory: "/nonexistent/nowhere".into(),
            layout: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}
