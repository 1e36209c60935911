// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage and configuration error specs

use crate::prelude::*;

#[test]
fn unknown_command_is_a_usage_error() {
    let temp = Project::empty();

    temp.ladder().args(&["frobnicate"]).exits(code::USAGE);
}

#[test]
fn run_without_a_command_is_a_usage_error() {
    let temp = Project::empty();

    temp.ladder().args(&["run"]).exits(code::USAGE);
}

#[test]
fn shared_role_in_mutex_mode_suggests_read_write() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["try", "--role", "shared"])
        .exits(code::USAGE)
        .stderr_has("read-write")
        .stderr_has("suggestions:");
}

#[test]
fn relative_directory_is_rejected() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["--dir", "locks", "status"])
        .exits(code::USAGE)
        .stderr_has("absolute");
}

#[test]
fn missing_config_file_is_reported() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["--config", "nope.toml", "status"])
        .exits(code::USAGE)
        .stderr_has("failed to read config")
        .stderr_has("nope.toml");
}

#[test]
fn unknown_config_key_is_reported() {
    let temp = Project::empty().file("ladder.toml", "directory = \"/locks\"\nflavour = \"x\"\n");

    temp.ladder()
        .args(&["--config", "ladder.toml", "status"])
        .exits(code::USAGE)
        .stderr_has("invalid config");
}

#[test]
fn zero_timeout_is_rejected() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["run", "--timeout", "0s", "--", "true"])
        .exits(code::USAGE)
        .stderr_has("timeout must be greater than zero");
}
