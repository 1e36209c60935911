// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination service adapters
//!
//! The lock protocol needs only a handful of primitives from the service:
//! sequential ephemeral creation, child listing, one-shot existence watches,
//! deletion, and session lifecycle notifications.

mod memory;
#[cfg(feature = "zookeeper")]
mod zk;

pub use memory::{MemoryNamespace, MemorySession, SessionStatus};
#[cfg(feature = "zookeeper")]
pub use zk::ZooKeeperCoordination;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CallKind, CoordinationCall, FakeCoordination};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};

/// Errors from coordination service operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    #[error("node does not exist: {0}")]
    NoNode(String),
    #[error("node already exists: {0}")]
    NodeExists(String),
    #[error("node has children: {0}")]
    NotEmpty(String),
    #[error("version mismatch on {0}")]
    BadVersion(String),
    #[error("not authorized for {0}")]
    NoAuth(String),
    #[error("connection to the coordination service lost")]
    ConnectionLoss,
    #[error("coordination session expired")]
    SessionExpired,
    #[error("coordination session closed")]
    Closed,
    #[error("coordination error: {0}")]
    Other(String),
}

impl CoordinationError {
    /// Errors after which the session's ephemeral registrations cannot be trusted
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            CoordinationError::ConnectionLoss
                | CoordinationError::SessionExpired
                | CoordinationError::Closed
        )
    }
}

/// Session lifecycle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    /// Every ephemeral node owned by the session is gone
    Expired,
    /// The session was closed by its owner
    Closed,
}

/// What a one-shot watch observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created { path: String },
    Deleted { path: String },
    Changed { path: String },
    /// The session ended before the watch fired
    SessionLost,
}

/// Result of an existence check that leaves a one-shot watch behind
#[derive(Debug)]
pub struct ExistsWatch {
    pub exists: bool,
    /// Resolves on the first change to the node; dropped sender means the session ended
    pub fired: oneshot::Receiver<WatchEvent>,
}

/// Facade over a hierarchical, watch-capable coordination namespace
#[async_trait]
pub trait Coordination: Clone + Send + Sync + 'static {
    /// Create `parent/prefix<sequence>` bound to this session; returns the full path
    async fn create_sequential_ephemeral(
        &self,
        parent: &str,
        prefix: &str,
        payload: Vec<u8>,
    ) -> Result<String, CoordinationError>;

    /// Create a persistent node and any missing ancestors; existing nodes are left alone
    async fn create_persistent_if_absent(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<(), CoordinationError>;

    /// Names (not paths) of the node's children
    async fn get_children(&self, path: &str) -> Result<Vec<String>, CoordinationError>;

    async fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError>;

    /// Check existence and leave a one-shot watch on the path
    async fn exists_watch(&self, path: &str) -> Result<ExistsWatch, CoordinationError>;

    /// Delete a node; `None` matches any version
    async fn delete(&self, path: &str, version: Option<i32>) -> Result<(), CoordinationError>;

    /// Subscribe to session lifecycle notifications
    fn session_events(&self) -> broadcast::Receiver<SessionEvent>;

    /// End the session; its ephemeral nodes are removed
    async fn close(&self) -> Result<(), CoordinationError>;
}
