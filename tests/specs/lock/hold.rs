// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder hold` specs

use crate::prelude::*;

#[test]
fn holds_then_releases_after_the_duration() {
    let temp = Project::empty();

    let run = temp
        .ladder()
        .args(&["hold", "--for", "20ms"])
        .passes()
        .stdout_has("Holding /locks/lock_0000000000")
        .stdout_has("Released /locks/lock_0000000000");

    let stdout = run.stdout();
    assert!(stdout.find("Holding") < stdout.find("Released"));
}

#[test]
fn bad_duration_is_a_usage_error() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["hold", "--for", "soon"])
        .exits(code::USAGE);
}
