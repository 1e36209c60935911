// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder try` specs

use crate::prelude::*;

#[test]
fn free_lock_is_acquired() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["try"])
        .passes()
        .stdout_has("Acquired /locks/lock_0000000000");
}

#[test]
fn runs_the_command_when_free() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["try", "--", "echo", "got it"])
        .passes()
        .stdout_has("got it")
        .stdout_lacks("Acquired");
}

#[test]
fn command_exit_code_passes_through() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["try", "--", "sh", "-c", "exit 9"])
        .exits(9);
}
