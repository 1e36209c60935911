// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder run`: hold the lock for the lifetime of a child process

use super::{lock_failure, LockArgs};
use crate::error::{exit, CliError};
use clap::Args;
use ladder_adapters::Coordination;
use ladder_engine::{LockHandle, Locker};
use std::process::{ExitCode, ExitStatus};

/// Set in the child's environment to the held registration path
pub const LOCK_PATH_ENV: &str = "LADDER_LOCK_PATH";

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub lock: LockArgs,

    /// Command to run once the lock is granted
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

pub async fn run<C: Coordination>(locker: &Locker<C>, args: RunArgs) -> Result<ExitCode, CliError> {
    let handle = locker
        .acquire(locker.config().role)
        .await
        .map_err(lock_failure(locker.config()))?;
    run_holding(locker, handle, &args.command).await
}

/// Run `command` to completion, then release `handle` whatever the outcome
pub(super) async fn run_holding<C: Coordination>(
    locker: &Locker<C>,
    mut handle: LockHandle<C>,
    command: &[String],
) -> Result<ExitCode, CliError> {
    let Some((program, rest)) = command.split_first() else {
        handle.release().await.map_err(lock_failure(locker.config()))?;
        return Ok(ExitCode::SUCCESS);
    };

    tracing::info!(path = %handle.path(), %program, "lock held, starting command");
    let status = tokio::process::Command::new(program)
        .args(rest)
        .env(LOCK_PATH_ENV, handle.path())
        .status()
        .await;

    handle.release().await.map_err(lock_failure(locker.config()))?;

    let status = status.map_err(|e| {
        CliError::new(format!("Failed to start '{}'", program))
            .with_context(e.to_string())
            .with_suggestion("Check that the command exists and is executable")
            .with_source(e)
    })?;
    tracing::info!(%status, "command finished, lock released");
    Ok(exit_code_of(status))
}

/// The child's own code; signal deaths count as a generic failure
fn exit_code_of(status: ExitStatus) -> ExitCode {
    match status.code().map(u8::try_from) {
        Some(Ok(code)) => ExitCode::from(code),
        _ => ExitCode::from(exit::GENERIC),
    }
}
