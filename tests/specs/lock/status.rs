// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder status` specs
//!
//! The memory backend starts empty in every process, so these cover the
//! output shape rather than live holders.

use crate::prelude::*;

#[test]
fn empty_directory_in_text() {
    let temp = Project::empty();

    temp.ladder()
        .args(&["--dir", "/locks/deploy", "status"])
        .passes()
        .stdout_has("No registrations in /locks/deploy");
}

#[test]
fn empty_directory_in_json() {
    let temp = Project::empty();

    let run = temp
        .ladder()
        .args(&["status", "--mode", "read-write", "--format", "json"])
        .passes();

    let json = run.stdout_json();
    assert_eq!(json["directory"], "/locks");
    assert_eq!(json["mode"], "read-write");
    assert_eq!(json["registrations"], serde_json::json!([]));
}
