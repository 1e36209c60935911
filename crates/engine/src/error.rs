// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock acquisition and release

use crate::ExecuteError;
use ladder_adapters::CoordinationError;
use ladder_core::ConfigError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced to lock callers
#[derive(Debug, Error)]
pub enum LockError {
    /// The session dropped or expired; every in-flight attempt is void
    #[error("lost connectivity to the coordination service: {0}")]
    Connectivity(CoordinationError),
    /// No node could be created, so no attempt was made
    #[error("could not register in the lock directory: {0}")]
    Registration(String),
    /// The deadline passed first; the registration was already withdrawn
    #[error("timed out waiting for {path} after {}ms", waited.as_millis())]
    AcquisitionTimeout { path: String, waited: Duration },
    #[error("gave up on {path}: predecessors vanished {attempts} times in a row")]
    RaceLimitExceeded { path: String, attempts: u32 },
    /// Own registration disappeared while waiting
    #[error("registration {path} disappeared")]
    Lost { path: String },
    /// A non-waiting attempt found the lock held
    #[error("lock {directory} is held")]
    WouldBlock { directory: String },
    #[error("coordination error: {0}")]
    Coordination(CoordinationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LockError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::AcquisitionTimeout { .. })
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, LockError::Connectivity(_))
    }
}

impl From<CoordinationError> for LockError {
    fn from(err: CoordinationError) -> Self {
        if err.is_connectivity() {
            LockError::Connectivity(err)
        } else {
            LockError::Coordination(err)
        }
    }
}

impl From<ExecuteError> for LockError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Coordination(e) => e.into(),
        }
    }
}
