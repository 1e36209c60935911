// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake coordination adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    Coordination, CoordinationError, ExistsWatch, MemoryNamespace, MemorySession, SessionEvent,
};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Operation kinds, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    CreateSequential,
    CreatePersistent,
    GetChildren,
    GetData,
    ExistsWatch,
    Delete,
    Close,
}

/// Recorded coordination call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinationCall {
    CreateSequential { parent: String, prefix: String },
    CreatePersistent { path: String },
    GetChildren { path: String },
    GetData { path: String },
    ExistsWatch { path: String },
    Delete { path: String },
    Close,
}

impl CoordinationCall {
    pub fn kind(&self) -> CallKind {
        match self {
            CoordinationCall::CreateSequential { .. } => CallKind::CreateSequential,
            CoordinationCall::CreatePersistent { .. } => CallKind::CreatePersistent,
            CoordinationCall::GetChildren { .. } => CallKind::GetChildren,
            CoordinationCall::GetData { .. } => CallKind::GetData,
            CoordinationCall::ExistsWatch { .. } => CallKind::ExistsWatch,
            CoordinationCall::Delete { .. } => CallKind::Delete,
            CoordinationCall::Close => CallKind::Close,
        }
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<CoordinationCall>,
    failures: VecDeque<(CallKind, CoordinationError)>,
    vanishing: HashSet<String>,
    vanish_all: bool,
}

/// Records calls against a real in-memory session and injects faults
#[derive(Clone)]
pub struct FakeCoordination {
    session: MemorySession,
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeCoordination {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCoordination {
    /// A fake with its own private namespace
    pub fn new() -> Self {
        Self::in_namespace(&MemoryNamespace::new())
    }

    /// A fake participating in a shared namespace
    pub fn in_namespace(namespace: &MemoryNamespace) -> Self {
        Self {
            session: namespace.session(),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn namespace(&self) -> &MemoryNamespace {
        self.session.namespace()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CoordinationCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Recorded calls of one kind
    pub fn calls_of(&self, kind: CallKind) -> Vec<CoordinationCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.kind() == kind)
            .collect()
    }

    /// Fail the next call of `kind` with `error`
    pub fn fail_next(&self, kind: CallKind, error: CoordinationError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .push_back((kind, error));
    }

    /// Delete `path` just before the next existence watch on it is registered
    pub fn vanish_before_watch(&self, path: &str) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .vanishing
            .insert(path.to_string());
    }

    /// Delete every watched node just before its watch is registered
    pub fn vanish_every_watch(&self) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).vanish_all = true;
    }

    fn record(&self, call: CoordinationCall) -> Result<(), CoordinationError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let kind = call.kind();
        state.calls.push(call);
        match state.failures.iter().position(|(k, _)| *k == kind) {
            Some(index) => match state.failures.remove(index) {
                Some((_, error)) => Err(error),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    fn should_vanish(&self, path: &str) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.vanish_all || state.vanishing.remove(path)
    }
}

#[async_trait]
impl Coordination for FakeCoordination {
    async fn create_sequential_ephemeral(
        &self,
        parent: &str,
        prefix: &str,
        payload: Vec<u8>,
    ) -> Result<String, CoordinationError> {
        self.record(CoordinationCall::CreateSequential {
            parent: parent.to_string(),
            prefix: prefix.to_string(),
        })?;
        self.session
            .create_sequential_ephemeral(parent, prefix, payload)
            .await
    }

    async fn create_persistent_if_absent(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<(), CoordinationError> {
        self.record(CoordinationCall::CreatePersistent {
            path: path.to_string(),
        })?;
        self.session.create_persistent_if_absent(path, payload).await
    }

    async fn get_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        self.record(CoordinationCall::GetChildren {
            path: path.to_string(),
        })?;
        self.session.get_children(path).await
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        self.record(CoordinationCall::GetData {
            path: path.to_string(),
        })?;
        self.session.get_data(path).await
    }

    async fn exists_watch(&self, path: &str) -> Result<ExistsWatch, CoordinationError> {
        self.record(CoordinationCall::ExistsWatch {
            path: path.to_string(),
        })?;
        if self.should_vanish(path) {
            let _ = self.namespace().remove(path);
        }
        self.session.exists_watch(path).await
    }

    async fn delete(&self, path: &str, version: Option<i32>) -> Result<(), CoordinationError> {
        self.record(CoordinationCall::Delete {
            path: path.to_string(),
        })?;
        self.session.delete(path, version).await
    }

    fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.session_events()
    }

    async fn close(&self) -> Result<(), CoordinationError> {
        self.record(CoordinationCall::Close)?;
        self.session.close().await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
