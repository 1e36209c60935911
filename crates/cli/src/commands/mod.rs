// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock commands
//!
//! Each command takes a ready [`Locker`]; [`execute`] builds it from the
//! merged configuration and closes the session afterwards.

pub mod attempt;
pub mod hold;
pub mod run;
pub mod simulate;
pub mod status;

use crate::error::CliError;
use clap::{Args, Subcommand};
use ladder_adapters::Coordination;
use ladder_core::{ConfigError, LockConfig, LockMode, NodeError, Role};
use ladder_engine::{LockError, Locker};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Subcommand, Debug)]
pub enum LockCommand {
    /// Run a command while holding the lock
    Run(run::RunArgs),
    /// Acquire the lock and keep it until interrupted
    Hold(hold::HoldArgs),
    /// Take the lock only if it is free right now
    Try(attempt::TryArgs),
    /// List registrations in the lock directory
    Status(status::StatusArgs),
}

/// Flags shared by every command that acquires
#[derive(Args, Debug, Clone, Default)]
pub struct LockArgs {
    /// exclusive (writer) or shared (reader)
    #[arg(long)]
    pub role: Option<Role>,

    /// mutex or read-write
    #[arg(long)]
    pub mode: Option<LockMode>,

    /// Give up after this long, e.g. 500ms or 2m
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

impl LockArgs {
    fn apply(&self, mut config: LockConfig) -> LockConfig {
        if let Some(mode) = self.mode {
            config = config.with_mode(mode);
        }
        if let Some(role) = self.role {
            config = config.with_role(role);
        }
        if self.timeout.is_some() {
            config = config.with_timeout(self.timeout);
        }
        config
    }
}

impl LockCommand {
    /// Layer this command's flags over `config` and validate the result
    pub fn configure(&self, config: LockConfig) -> Result<LockConfig, CliError> {
        let config = match self {
            LockCommand::Run(args) => args.lock.apply(config),
            LockCommand::Hold(args) => args.lock.apply(config),
            LockCommand::Try(args) => args.lock.apply(config),
            LockCommand::Status(args) => match args.mode {
                Some(mode) => config.with_mode(mode),
                None => config,
            },
        };
        config.validate().map_err(invalid_config)?;
        Ok(config)
    }

    fn acquires(&self) -> bool {
        !matches!(self, LockCommand::Status(_))
    }
}

fn invalid_config(err: ConfigError) -> CliError {
    let shared_in_mutex = matches!(err, ConfigError::Invalid(NodeError::SharedRoleInMutexMode));
    let err = CliError::config(None, err);
    if shared_in_mutex {
        err.with_suggestion("Shared locks need --mode read-write")
    } else {
        err
    }
}

/// Map lock failures to CLI errors that name the service address
pub(crate) fn lock_failure(config: &LockConfig) -> impl Fn(LockError) -> CliError + '_ {
    move |err| CliError::from_lock(err, &config.connect)
}

pub async fn execute<C: Coordination>(
    coordination: C,
    config: LockConfig,
    command: LockCommand,
) -> Result<ExitCode, CliError> {
    let connect = config.connect.clone();
    let locker =
        Locker::new(coordination, config).map_err(|e| CliError::from_lock(e, &connect))?;

    if command.acquires() {
        locker
            .ensure_directory()
            .await
            .map_err(lock_failure(locker.config()))?;
    }

    let result = match command {
        LockCommand::Run(args) => run::run(&locker, args).await,
        LockCommand::Hold(args) => hold::hold(&locker, args).await,
        LockCommand::Try(args) => attempt::attempt(&locker, args).await,
        LockCommand::Status(args) => status::status(&locker, args).await,
    };

    if let Err(e) = locker.close().await {
        tracing::debug!(error = %e, "closing the session failed");
    }
    result
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
