// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber setup
//!
//! Logs go to stderr so they never mix with command output, or to a file
//! when `--log-file` is given. `RUST_LOG` picks the filter unless `-v`
//! forces debug output.

use crate::error::CliError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered file output is flushed.
pub fn setup(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let Some(path) = log_file else {
        let _ = tracing_subscriber::registry()
            .with(filter(verbose))
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return Ok(None);
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Some(file_name) = path.file_name() else {
        return Err(CliError::new(format!("Invalid log file: {}", path.display()))
            .with_suggestion("Pass a file path, e.g. --log-file ladder.log"));
    };
    std::fs::create_dir_all(directory).map_err(|e| {
        CliError::new(format!("Cannot create log directory {}", directory.display()))
            .with_source(e)
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();
    Ok(Some(guard))
}
