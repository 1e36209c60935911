// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder status`: who holds the lock and who is queued

use super::lock_failure;
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use clap::Args;
use ladder_adapters::Coordination;
use ladder_core::LockMode;
use ladder_engine::{Locker, SiblingStatus};
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// How to interpret registrations: mutex or read-write
    #[arg(long)]
    pub mode: Option<LockMode>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub directory: String,
    pub mode: LockMode,
    pub registrations: Vec<SiblingStatus>,
}

impl StatusReport {
    pub fn holders(&self) -> usize {
        self.registrations.iter().filter(|s| s.granted).count()
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.registrations.is_empty() {
            return writeln!(f, "No registrations in {}", self.directory);
        }

        writeln!(
            f,
            "{} ({}): {} holding, {} waiting",
            self.directory,
            self.mode,
            self.holders(),
            self.registrations.len() - self.holders()
        )?;
        writeln!(f, "{:<20} {:<10} {:<30} OWNER", "NODE", "ROLE", "STATE")?;
        for status in &self.registrations {
            let state = match (&status.waiting_on, status.granted) {
                (_, true) => "holding".to_string(),
                (Some(predecessor), false) => format!("waiting on {}", predecessor),
                (None, false) => "waiting".to_string(),
            };
            let owner = status
                .owner
                .as_ref()
                .map(|owner| owner.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<20} {:<10} {:<30} {}",
                status.node,
                status.role.to_string(),
                state,
                owner
            )?;
        }
        Ok(())
    }
}

pub async fn status<C: Coordination>(
    locker: &Locker<C>,
    args: StatusArgs,
) -> Result<ExitCode, CliError> {
    let registrations = locker
        .siblings()
        .await
        .map_err(lock_failure(locker.config()))?;

    let report = StatusReport {
        directory: locker.config().directory.to_string(),
        mode: locker.config().mode,
        registrations,
    };
    output::print(&report, args.format);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
