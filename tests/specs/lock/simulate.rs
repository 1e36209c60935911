// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder simulate` specs

use crate::prelude::*;

#[test]
fn default_crowd_keeps_exclusion() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["simulate"])
        .passes()
        .stdout_has("/locks (read-write)")
        .stdout_has("writer-1")
        .stdout_has("reader-3")
        .stdout_has("exclusion held: 5 granted, 0 timed out");
}

#[test]
fn json_report_has_the_timeline() {
    let temp = Project::empty();

    let run = temp
        .ladder()
        .args(&[
            "simulate",
            "--writers",
            "2",
            "--readers",
            "2",
            "--hold",
            "5ms",
            "--format",
            "json",
        ])
        .passes();

    let json = run.stdout_json();
    assert_eq!(json["exclusive"], true);
    assert_eq!(json["timeline"].as_array().unwrap().len(), 4);
    assert_eq!(json["violations"], serde_json::json!([]));
}

#[test]
fn mutex_mode_runs_writers_only() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["simulate", "--mode", "mutex", "--writers", "3", "--readers", "0"])
        .passes()
        .stdout_has("lock_0000000002")
        .stdout_has("up to 0 concurrent readers");
}

#[test]
fn readers_in_mutex_mode_are_refused() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["simulate", "--mode", "mutex"])
        .exits(code::USAGE)
        .stderr_has("--readers 0");
}

#[test]
fn short_timeouts_are_listed() {
    let temp = Project::empty();

    temp.ladder()
        .args(&[
            "simulate",
            "--writers",
            "3",
            "--readers",
            "0",
            "--hold",
            "300ms",
            "--timeout",
            "30ms",
        ])
        .passes()
        .stdout_has("timed out: ")
        .stdout_has("exclusion held");
}
