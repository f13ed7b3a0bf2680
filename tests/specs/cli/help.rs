//! Help and usage specs.

use crate::prelude::*;

#[test]
fn help_lists_the_subcommands() {
    let world = World::new();
    world
        .troupe()
        .args(&["--help"])
        .passes()
        .stdout_has("hook")
        .stdout_has("status")
        .stdout_has("send")
        .stdout_has("wake");
}

#[test]
fn version_prints() {
    let world = World::new();
    world.troupe().args(&["--version"]).passes().stdout_has("troupe");
}

#[test]
fn unknown_subcommand_fails() {
    let world = World::new();
    world.troupe().args(&["teleport"]).fails();
}

#[test]
fn hook_requires_a_name() {
    let world = World::new();
    world.troupe().args(&["hook"]).fails();
}
