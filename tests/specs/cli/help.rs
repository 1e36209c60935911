// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and completions specs

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let temp = Project::empty();

    let run = temp.ladder().args(&["--help"]).passes();
    for command in ["run", "hold", "try", "status", "simulate", "completions"] {
        assert!(run.stdout().contains(command), "help is missing {}", command);
    }
}

#[test]
fn run_help_documents_lock_flags() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--role")
        .stdout_has("--mode")
        .stdout_has("--timeout");
}

#[test]
fn completions_name_the_binary() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("ladder");
}
