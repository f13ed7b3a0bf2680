//! Dashboard specs, including cross-session conflict detection.

use crate::prelude::*;

#[test]
fn status_on_an_empty_root() {
    let world = World::new();
    world
        .troupe()
        .args(&["status"])
        .passes()
        .stdout_has("SESSIONS (0)");
}

#[test]
fn status_lists_registered_sessions() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.register("e5f6g7h8ijklmnop", cwd.path());

    world
        .troupe()
        .args(&["status"])
        .passes()
        .stdout_has("SESSIONS (2)")
        .stdout_has("a1b2c3d4")
        .stdout_has("e5f6g7h8");
}

#[test]
fn two_sessions_touching_one_file_is_a_conflict() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.register("e5f6g7h8ijklmnop", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Edit", Some("src/auth.ts"));
    world.heartbeat("e5f6g7h8ijklmnop", "Edit", Some("src/auth.ts"));

    world
        .troupe()
        .args(&["status"])
        .passes()
        .stdout_has("CONFLICTS (1)")
        .stdout_has("src/auth.ts")
        .stdout_has("a1b2c3d4")
        .stdout_has("e5f6g7h8");
}

#[test]
fn disjoint_files_are_not_conflicts() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.register("e5f6g7h8ijklmnop", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Edit", Some("src/a.ts"));
    world.heartbeat("e5f6g7h8ijklmnop", "Edit", Some("src/b.ts"));

    world
        .troupe()
        .args(&["status"])
        .passes()
        .stdout_lacks("CONFLICTS");
}

#[test]
fn conflict_guard_warns_the_second_editor() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.register("e5f6g7h8ijklmnop", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Edit", Some("src/auth.ts"));

    // Advisory: warns on stderr but exits 0.
    world
        .troupe()
        .args(&["hook", "guard"])
        .stdin(
            r#"{"session_id": "e5f6g7h8ijklmnop", "tool_name": "Edit",
                "tool_input": {"file_path": "src/auth.ts"}}"#,
        )
        .passes()
        .stderr_has("[CONFLICT] src/auth.ts")
        .stderr_has("a1b2c3d4");
}

#[test]
fn guard_skip_rule_silences_the_warning() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Edit", Some("src/auth.ts"));

    world
        .troupe()
        .args(&["hook", "guard"])
        .env("TROUPE_GUARD_SKIP_RULES", "conflict")
        .stdin(
            r#"{"session_id": "e5f6g7h8ijklmnop", "tool_name": "Edit",
                "tool_input": {"file_path": "src/auth.ts"}}"#,
        )
        .passes()
        .stderr_lacks("[CONFLICT]");
}

#[test]
fn unknown_skip_rules_warn_but_do_not_skip() {
    let world = World::new();
    let cwd = tempfile::tempdir().unwrap();
    world.register("a1b2c3d4e5f6g7h8", cwd.path());
    world.heartbeat("a1b2c3d4e5f6g7h8", "Edit", Some("src/auth.ts"));

    world
        .troupe()
        .args(&["hook", "guard"])
        .env("TROUPE_GUARD_SKIP_RULES", "everything")
        .stdin(
            r#"{"session_id": "e5f6g7h8ijklmnop", "tool_name": "Edit",
                "tool_input": {"file_path": "src/auth.ts"}}"#,
        )
        .passes()
        .stderr_has("ignoring unknown skip rule")
        .stderr_has("[CONFLICT]");
}
