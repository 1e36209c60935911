// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder try`: one non-waiting attempt

use super::run::run_holding;
use super::{lock_failure, LockArgs};
use crate::error::CliError;
use clap::Args;
use ladder_adapters::Coordination;
use ladder_engine::Locker;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct TryArgs {
    #[command(flatten)]
    pub lock: LockArgs,

    /// Command to run if the lock was free
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

pub async fn attempt<C: Coordination>(
    locker: &Locker<C>,
    args: TryArgs,
) -> Result<ExitCode, CliError> {
    let mut handle = locker
        .try_acquire(locker.config().role)
        .await
        .map_err(lock_failure(locker.config()))?;

    if !args.command.is_empty() {
        return run_holding(locker, handle, &args.command).await;
    }

    println!("Acquired {}", handle.path());
    handle.release().await.map_err(lock_failure(locker.config()))?;
    Ok(ExitCode::SUCCESS)
}
