// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging specs

use crate::prelude::*;

#[test]
fn quiet_by_default() {
    let temp = Project::empty();

    let run = temp
        .ladder()
        .args(&["simulate", "--writers", "1", "--readers", "0"])
        .passes()
        .stdout_has("exclusion held");
    assert_eq!(run.stderr(), "");
}

#[test]
fn rust_log_enables_logs_on_stderr() {
    let temp = Project::empty();

    temp.ladder()
        .env("RUST_LOG", "info")
        .args(&["simulate", "--writers", "1", "--readers", "1"])
        .passes()
        .stderr_has("simulation finished")
        .stdout_lacks("simulation finished");
}

#[test]
fn log_file_receives_verbose_output() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["-v", "--log-file", "logs/ladder.log", "simulate", "--readers", "0"])
        .passes();

    let log = std::fs::read_to_string(temp.join("logs/ladder.log")).unwrap();
    assert!(log.contains("simulation finished"));
    assert!(log.contains("DEBUG"));
}
