// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ladder - distributed locks from the command line

mod backend;
mod commands;
mod completions;
mod error;
mod logging;
mod output;

use backend::Backend;
use clap::{Parser, Subcommand};
use commands::{simulate, LockCommand};
use completions::CompletionsArgs;
use error::CliError;
use ladder_core::{LockConfig, LockPath};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "ladder",
    version,
    about = "Ladder - sequential-node distributed locks"
)]
pub(crate) struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coordination service address, e.g. zk1:2181,zk2:2181
    #[arg(long, global = true)]
    connect: Option<String>,

    /// Lock directory
    #[arg(long = "dir", global = true)]
    directory: Option<String>,

    /// Coordination backend
    #[arg(long, global = true, value_enum, default_value_t = Backend::default())]
    backend: Backend,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Lock(LockCommand),
    /// Race readers and writers against an in-process namespace
    Simulate(simulate::SimulateArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::setup(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprint!("{}", e);
            return e.exit_code();
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprint!("{}", e);
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Completions(args) => {
            let mut stdout = std::io::stdout();
            completions::generate_completions::<Cli>(args.shell, &mut stdout);
            let _ = stdout.flush();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Simulate(args) => simulate::simulate(args, &config).await,
        Commands::Lock(command) => {
            let config = command.configure(config)?;
            backend::dispatch(cli.backend, config, command).await
        }
    }
}

/// File values first, then global flags on top
fn load_config(cli: &Cli) -> Result<LockConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => LockConfig::load(path).map_err(|e| CliError::config(Some(path), e))?,
        None => LockConfig::default(),
    };
    if let Some(connect) = &cli.connect {
        config = config.with_connect(connect.clone());
    }
    if let Some(directory) = &cli.directory {
        config.directory = LockPath::new(directory.clone()).map_err(|e| {
            CliError::new(e.to_string())
                .with_suggestion("Lock directories are absolute, e.g. --dir /locks/deploy")
                .with_code(error::exit::USAGE)
        })?;
    }
    Ok(config)
}
