// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend selection
//!
//! Commands are written once against [`Coordination`]; this module opens
//! the chosen backend and hands it over.

use crate::commands::{self, LockCommand};
use crate::error::CliError;
use clap::ValueEnum;
use ladder_adapters::{MemoryNamespace, TracedCoordination};
use ladder_core::LockConfig;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Process-local namespace; locks only exclude within this process
    #[cfg_attr(not(feature = "zookeeper"), default)]
    Memory,
    /// A ZooKeeper ensemble at `--connect`
    #[cfg_attr(feature = "zookeeper", default)]
    Zookeeper,
}

pub async fn dispatch(
    backend: Backend,
    config: LockConfig,
    command: LockCommand,
) -> Result<ExitCode, CliError> {
    match backend {
        Backend::Memory => {
            tracing::debug!("using the in-process namespace");
            let namespace = MemoryNamespace::new();
            let session = TracedCoordination::new(namespace.session());
            commands::execute(session, config, command).await
        }
        Backend::Zookeeper => zookeeper(config, command).await,
    }
}

#[cfg(feature = "zookeeper")]
async fn zookeeper(config: LockConfig, command: LockCommand) -> Result<ExitCode, CliError> {
    use ladder_adapters::ZooKeeperCoordination;

    tracing::debug!(connect = %config.connect, "connecting to zookeeper");
    let client = ZooKeeperCoordination::connect(&config.connect, config.session_timeout)
        .await
        .map_err(|e| {
            CliError::unreachable(&config.connect)
                .with_context(e.to_string())
                .with_source(e)
        })?;
    commands::execute(TracedCoordination::new(client), config, command).await
}

#[cfg(not(feature = "zookeeper"))]
async fn zookeeper(_config: LockConfig, _command: LockCommand) -> Result<ExitCode, CliError> {
    Err(CliError::backend_unavailable("zookeeper"))
}
