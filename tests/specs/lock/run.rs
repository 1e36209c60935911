// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder run` specs

use crate::prelude::*;

#[test]
fn exits_with_the_child_code() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["run", "--", "sh", "-c", "exit 7"])
        .exits(7);
}

#[test]
fn child_sees_its_registration() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["run", "--", "sh", "-c", "echo held $LADDER_LOCK_PATH"])
        .passes()
        .stdout_has("held /locks/lock_0000000000");
}

#[test]
fn shared_registrations_use_the_read_prefix() {
    let temp = Project::empty();

    temp.ladder()
        .args(&[
            "--dir",
            "/locks/reports",
            "run",
            "--mode",
            "read-write",
            "--role",
            "shared",
            "--",
            "sh",
            "-c",
            "echo $LADDER_LOCK_PATH",
        ])
        .passes()
        .stdout_has("/locks/reports/read_0000000000");
}

#[test]
fn config_file_sets_the_directory() {
    let temp = Project::empty().file(
        "ladder.toml",
        "directory = \"/app/deploy\"\nmode = \"read-write\"\n",
    );
    let config = temp.path().join("ladder.toml");

    temp.ladder()
        .args(&[
            "--config",
            config.to_str().unwrap(),
            "run",
            "--",
            "sh",
            "-c",
            "echo $LADDER_LOCK_PATH",
        ])
        .passes()
        .stdout_has("/app/deploy/write_0000000000");
}

#[test]
fn missing_program_fails_after_releasing() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["run", "--", "ladder-no-such-program"])
        .fails()
        .stderr_has("Failed to start 'ladder-no-such-program'");
}
