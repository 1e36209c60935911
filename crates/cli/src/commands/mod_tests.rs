// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::exit;
use crate::{Cli, Commands};
use clap::Parser;
use ladder_adapters::MemoryNamespace;
use ladder_core::LockPath;

fn config() -> LockConfig {
    LockConfig::new(LockPath::new("/locks/test").unwrap())
}

fn try_command() -> LockCommand {
    LockCommand::Try(attempt::TryArgs {
        lock: LockArgs::default(),
        command: Vec::new(),
    })
}

fn parse(args: &[&str]) -> LockCommand {
    let cli = Cli::try_parse_from(std::iter::once("ladder").chain(args.iter().copied())).unwrap();
    match cli.command {
        Commands::Lock(command) => command,
        _ => panic!("not a lock command: {:?}", args),
    }
}

#[test]
fn flags_override_the_file() {
    let command = parse(&["run", "--mode", "read-write", "--role", "shared", "--timeout", "3s", "--", "true"]);

    let config = command.configure(config()).unwrap();

    assert_eq!(config.mode, LockMode::ReadWrite);
    assert_eq!(config.role, Role::Shared);
    assert_eq!(config.timeout, Some(Duration::from_secs(3)));
}

#[test]
fn absent_flags_keep_file_values() {
    let file = config().with_timeout(Some(Duration::from_secs(9)));

    let config = parse(&["hold"]).configure(file.clone()).unwrap();

    assert_eq!(config, file);
}

#[test]
fn shared_role_needs_read_write_mode() {
    let err = parse(&["try", "--role", "shared"]).configure(config()).unwrap_err();

    assert_eq!(err.code, exit::USAGE);
    assert!(err
        .suggestions
        .iter()
        .any(|s| s.contains("--mode read-write")));
}

#[test]
fn run_requires_a_command() {
    assert!(Cli::try_parse_from(["ladder", "run"]).is_err());
}

#[tokio::test]
async fn try_succeeds_on_a_free_lock() {
    let namespace = MemoryNamespace::new();

    let code = execute(namespace.session(), config(), try_command())
        .await
        .unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(namespace.children("/locks/test").is_empty());
}

#[tokio::test]
async fn try_would_block_while_another_session_holds() {
    let namespace = MemoryNamespace::new();
    let holder = Locker::new(namespace.session(), config()).unwrap();
    holder.ensure_directory().await.unwrap();
    let _held = holder.acquire(Role::Exclusive).await.unwrap();

    let err = execute(namespace.session(), config(), try_command())
        .await
        .unwrap_err();

    assert_eq!(err.code, exit::WOULD_BLOCK);
    assert_eq!(namespace.children("/locks/test").len(), 1);
}

#[tokio::test]
async fn run_times_out_behind_a_holder() {
    let namespace = MemoryNamespace::new();
    let holder = Locker::new(namespace.session(), config()).unwrap();
    holder.ensure_directory().await.unwrap();
    let _held = holder.acquire(Role::Exclusive).await.unwrap();

    let command = parse(&["run", "--timeout", "50ms", "--", "true"]);
    let config = command.configure(config()).unwrap();
    let err = execute(namespace.session(), config, command)
        .await
        .unwrap_err();

    assert_eq!(err.code, exit::TIMEOUT);
}

#[tokio::test]
async fn status_of_a_missing_directory_is_empty() {
    let namespace = MemoryNamespace::new();
    let command = parse(&["status"]);

    let code = execute(namespace.session(), config(), command).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(!namespace.exists("/locks/test"));
}
