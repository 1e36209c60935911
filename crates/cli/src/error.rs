// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every error carries:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)
//! - The process exit code it maps to

use ladder_core::ConfigError;
use ladder_engine::LockError;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

/// Process exit codes
pub mod exit {
    pub const GENERIC: u8 = 1;
    /// Also what clap uses for argument errors
    pub const USAGE: u8 = 2;
    pub const WOULD_BLOCK: u8 = 3;
    pub const TIMEOUT: u8 = 4;
    pub const CONNECTIVITY: u8 = 5;
}

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub code: u8,
    /// Original error if any
    pub source: Option<anyhow::Error>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            code: exit::GENERIC,
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.code = code;
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// A non-waiting attempt found the lock taken.
    pub fn lock_held(directory: &str) -> Self {
        CliError::new(format!("Lock '{}' is held", directory))
            .with_context("Another participant is registered ahead of this one")
            .with_suggestion(format!(
                "Wait for it instead: ladder run --dir {} -- <command>",
                directory
            ))
            .with_suggestion(format!("See who holds it: ladder status --dir {}", directory))
            .with_code(exit::WOULD_BLOCK)
    }

    /// The deadline passed before the lock was granted.
    pub fn timed_out(path: &str, waited: Duration) -> Self {
        CliError::new(format!(
            "Timed out after {} waiting for the lock",
            humantime::format_duration(waited)
        ))
        .with_context(format!("Registration {} was withdrawn", path))
        .with_suggestion("Allow longer with --timeout")
        .with_suggestion("Check the current holder: ladder status")
        .with_code(exit::TIMEOUT)
    }

    /// The coordination service could not be reached or the session ended.
    pub fn unreachable(connect: &str) -> Self {
        CliError::new("Lost contact with the coordination service")
            .with_context(format!("Connect address: {}", connect))
            .with_suggestion("Check the address with --connect or `connect` in the config file")
            .with_suggestion("Try again once the ensemble is reachable")
            .with_code(exit::CONNECTIVITY)
    }

    /// A config file could not be read or failed validation.
    pub fn config(path: Option<&Path>, err: ConfigError) -> Self {
        let err = CliError::new(err.to_string()).with_code(exit::USAGE);
        match path {
            Some(path) => err
                .with_context(format!("Config file: {}", path.display()))
                .with_suggestion("Fix the file or override the value with a flag"),
            None => err,
        }
    }

    /// The binary was built without the requested backend.
    pub fn backend_unavailable(backend: &str) -> Self {
        CliError::new(format!("The {} backend is not available in this build", backend))
            .with_suggestion("Rebuild with: cargo install ladder --features zookeeper")
            .with_suggestion("Use the in-process backend: --backend memory")
            .with_code(exit::USAGE)
    }

    /// Translate a lock failure, naming the service address for connectivity errors.
    pub fn from_lock(err: LockError, connect: &str) -> Self {
        let message = err.to_string();
        match err {
            LockError::WouldBlock { directory } => CliError::lock_held(&directory),
            LockError::AcquisitionTimeout { path, waited } => CliError::timed_out(&path, waited),
            LockError::Connectivity(source) => CliError::unreachable(connect)
                .with_context(source.to_string())
                .with_source(source),
            LockError::Registration(reason) => CliError::new("Could not register for the lock")
                .with_context(reason)
                .with_suggestion("Check that the lock directory exists and is writable"),
            LockError::RaceLimitExceeded { .. } => CliError::new(message)
                .with_context("Predecessors kept releasing before they could be watched")
                .with_suggestion("Retry; heavy churn in the lock directory usually settles"),
            LockError::Lost { path } => CliError::new(format!("Registration {} was lost", path))
                .with_context("The node was deleted or its session expired while waiting"),
            LockError::Coordination(source) => CliError::new(message).with_source(source),
            LockError::Config(source) => CliError::config(None, source),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
