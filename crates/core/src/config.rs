// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock client configuration
//!
//! Loaded from TOML; every field has a default so a file only needs the
//! values it changes:
//!
//! ```toml
//! connect = "zk1:2181,zk2:2181"
//! directory = "/app/locks/deploy"
//! mode = "read-write"
//! role = "shared"
//! timeout = "30s"
//! ```

use crate::coordination::{AcquireOptions, LockMode, LockPath, NodeError, Role};
use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] NodeError),
    #[error("invalid config: timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid config: connect address is empty")]
    EmptyConnect,
}

/// Everything a participant needs to take part in one lock directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// Coordination service address (comma-separated host:port list)
    pub connect: String,
    /// Directory holding the registrations
    pub directory: LockPath,
    pub mode: LockMode,
    pub role: Role,
    /// How long one attempt may wait; unset waits indefinitely
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// Session timeout negotiated with the coordination service
    #[serde(with = "humantime_serde")]
    pub session_timeout: Duration,
    /// Consecutive predecessor races tolerated per attempt
    pub max_race_retries: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            connect: "127.0.0.1:2181".to_string(),
            directory: LockPath::default(),
            mode: LockMode::Mutex,
            role: Role::Exclusive,
            timeout: None,
            session_timeout: Duration::from_secs(10),
            max_race_retries: 16,
        }
    }
}

impl LockConfig {
    pub fn new(directory: LockPath) -> Self {
        Self {
            directory,
            ..Self::default()
        }
    }

    /// Read and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect.trim().is_empty() {
            return Err(ConfigError::EmptyConnect);
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        self.mode.prefix_for(self.role)?;
        Ok(())
    }

    pub fn with_connect(mut self, connect: impl Into<String>) -> Self {
        self.connect = connect.into();
        self
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

    /// Options for one attempt with the configured role
    pub fn acquire_options(&self, owner: ParticipantId) -> AcquireOptions {
        self.acquire_options_for(owner, self.role)
    }

    /// Options for one attempt with an explicit role
    pub fn acquire_options_for(&self, owner: ParticipantId, role: Role) -> AcquireOptions {
        AcquireOptions::new(self.directory.clone(), owner)
            .with_mode(self.mode)
            .with_role(role)
            .with_timeout(self.timeout)
            .with_max_race_retries(self.max_race_retries)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
