// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder simulate`: contention dry run in one process

use crate::error::{exit, CliError};
use crate::output::{self, OutputFormat};
use clap::Args;
use ladder_core::{LockConfig, LockMode};
use ladder_engine::{SimulationConfig, SimulationReport};
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Participants asking for exclusive access
    #[arg(long, default_value_t = 2)]
    pub writers: usize,

    /// Participants asking for shared access
    #[arg(long, default_value_t = 3)]
    pub readers: usize,

    /// How long each participant keeps the lock
    #[arg(long, default_value = "20ms", value_parser = humantime::parse_duration)]
    pub hold: Duration,

    /// Per-participant acquisition timeout
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// mutex or read-write; readers need read-write
    #[arg(long, default_value_t = LockMode::ReadWrite)]
    pub mode: LockMode,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Verdict<'a> {
    directory: String,
    mode: LockMode,
    exclusive: bool,
    #[serde(flatten)]
    report: &'a SimulationReport,
}

impl fmt::Display for Verdict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.directory, self.mode)?;
        for entry in &self.report.timeline {
            writeln!(
                f,
                "{:>6}ms .. {:>6}ms  {:<10} {:<9} {}",
                entry.granted_at_ms,
                entry.released_at_ms,
                entry.participant,
                entry.role.to_string(),
                entry.node
            )?;
        }
        if !self.report.timed_out.is_empty() {
            writeln!(f, "timed out: {}", self.report.timed_out.join(", "))?;
        }

        if self.exclusive {
            writeln!(
                f,
                "exclusion held: {} granted, {} timed out, up to {} concurrent readers",
                self.report.timeline.len(),
                self.report.timed_out.len(),
                self.report.max_concurrent_readers
            )
        } else {
            writeln!(f, "exclusion VIOLATED:")?;
            for violation in &self.report.violations {
                writeln!(f, "  - {}", violation)?;
            }
            Ok(())
        }
    }
}

pub async fn simulate(args: SimulateArgs, config: &LockConfig) -> Result<ExitCode, CliError> {
    let report = ladder_engine::simulate(SimulationConfig {
        directory: config.directory.clone(),
        mode: args.mode,
        writers: args.writers,
        readers: args.readers,
        hold: args.hold,
        timeout: args.timeout.or(config.timeout),
    })
    .await
    .map_err(|e| {
        let err = CliError::from_lock(e, "in-process");
        if args.readers > 0 && args.mode == LockMode::Mutex {
            err.with_suggestion("Drop --mode mutex or pass --readers 0")
        } else {
            err
        }
    })?;

    let verdict = Verdict {
        directory: config.directory.to_string(),
        mode: args.mode,
        exclusive: report.is_exclusive(),
        report: &report,
    };
    output::print(&verdict, args.format);

    if verdict.exclusive {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(exit::GENERIC))
    }
}
