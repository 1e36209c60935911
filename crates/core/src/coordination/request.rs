// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A participant's own registration in a lock directory

use super::node::{LockMode, LockPath, NodeName, Role};
use crate::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to acquire and how long to wait for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquireOptions {
    pub directory: LockPath,
    pub mode: LockMode,
    pub role: Role,
    pub owner: ParticipantId,
    /// None waits until granted or the session ends
    pub timeout: Option<Duration>,
    /// Consecutive predecessor races tolerated before giving up
    pub max_race_retries: u32,
}

impl AcquireOptions {
    pub fn new(directory: LockPath, owner: ParticipantId) -> Self {
        Self {
            directory,
            mode: LockMode::Mutex,
            role: Role::Exclusive,
            owner,
            timeout: None,
            max_race_retries: 16,
        }
    }

    pub fn with_mode(mut self, mode: LockMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_race_retries(mut self, retries: u32) -> Self {
        self.max_race_retries = retries;
        self
    }
}

/// A created registration node, owned by exactly one participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRequest {
    pub directory: LockPath,
    pub name: NodeName,
    pub role: Role,
    pub mode: LockMode,
    pub owner: ParticipantId,
    pub created_at: DateTime<Utc>,
    /// Registrations are always bound to the creating session
    pub ephemeral: bool,
}

impl LockRequest {
    /// Full namespace path of the registration node
    pub fn path(&self) -> String {
        self.directory.join(self.name.as_str())
    }

    pub fn sequence(&self) -> u64 {
        self.name.sequence()
    }
}

impl std::fmt::Display for LockRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.path(), self.role)
    }
}
