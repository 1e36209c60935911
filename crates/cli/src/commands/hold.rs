// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ladder hold`: acquire and sit on the lock

use super::{lock_failure, LockArgs};
use crate::error::CliError;
use clap::Args;
use ladder_adapters::{Coordination, SessionEvent};
use ladder_engine::Locker;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};

#[derive(Args, Debug)]
pub struct HoldArgs {
    #[command(flatten)]
    pub lock: LockArgs,

    /// Release after this long instead of waiting for Ctrl-C
    #[arg(long = "for", value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,
}

pub async fn hold<C: Coordination>(locker: &Locker<C>, args: HoldArgs) -> Result<ExitCode, CliError> {
    let mut session = locker.coordination().session_events();
    let mut handle = locker
        .acquire(locker.config().role)
        .await
        .map_err(lock_failure(locker.config()))?;

    println!("Holding {}", handle.path());
    let _ = std::io::stdout().flush();

    tokio::select! {
        _ = elapsed(args.duration) => {
            tracing::debug!("hold duration elapsed");
        }
        _ = interrupted() => {
            tracing::debug!("interrupted");
        }
        _ = session_ended(&mut session) => {
            return Err(CliError::unreachable(&locker.config().connect)
                .with_context(format!("{} is no longer held", handle.path())));
        }
    }

    handle.release().await.map_err(lock_failure(locker.config()))?;
    println!("Released {}", handle.path());
    Ok(ExitCode::SUCCESS)
}

async fn elapsed(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Resolves once the session can no longer keep the registration alive
async fn session_ended(session: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match session.recv().await {
            Ok(SessionEvent::Expired | SessionEvent::Closed) | Err(RecvError::Closed) => return,
            Ok(SessionEvent::Disconnected) => {
                tracing::warn!("coordination session disconnected while holding");
            }
            Ok(SessionEvent::Connected) | Err(RecvError::Lagged(_)) => {}
        }
    }
}
