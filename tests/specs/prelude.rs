// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs
//!
//! Every test runs the real `ladder` binary inside a scratch directory,
//! always on the in-process backend so no ensemble is needed.

pub use predicates::prelude::*;

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod code {
    /// Bad flags, bad config, or an unavailable backend
    pub const USAGE: i32 = 2;
}

/// A scratch working directory for one test
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `relative` inside the project
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// `ladder --backend memory` with logging quiet unless a test asks
    pub fn ladder(&self) -> Cli {
        let mut cmd = Command::cargo_bin("ladder").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .args(["--backend", "memory"]);
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        Run(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Run {
        Run(self.cmd.assert().failure())
    }

    pub fn exits(mut self, code: i32) -> Run {
        Run(self.cmd.assert().code(code))
    }
}

pub struct Run(Assert);

impl Run {
    pub fn stdout_has(self, expected: &str) -> Self {
        Run(self.0.stdout(predicate::str::contains(expected)))
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Run(self.0.stdout(predicate::str::contains(unexpected).not()))
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Run(self.0.stderr(predicate::str::contains(expected)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stderr).into_owned()
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.0.get_output().stdout).unwrap()
    }
}
