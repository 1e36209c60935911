// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process coordination namespace
//!
//! Behaves like a single coordination server: per-parent sequence counters,
//! ephemeral nodes owned by sessions, one-shot watches, and session expiry
//! that removes every ephemeral node the session owned. Many sessions can
//! share one namespace, which is how independent participants are simulated
//! inside a single process.

use super::{Coordination, CoordinationError, ExistsWatch, SessionEvent, WatchEvent};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, oneshot};

/// Lifecycle of one in-memory session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connected,
    /// Temporarily unreachable; ephemeral nodes survive
    Disconnected,
    Expired,
    Closed,
}

#[derive(Debug)]
struct Node {
    data: Vec<u8>,
    version: i32,
    ephemeral_owner: Option<u64>,
    next_sequence: u64,
}

impl Node {
    fn new(data: Vec<u8>, ephemeral_owner: Option<u64>) -> Self {
        Self {
            data,
            version: 0,
            ephemeral_owner,
            next_sequence: 0,
        }
    }
}

struct Watcher {
    session: u64,
    tx: oneshot::Sender<WatchEvent>,
}

struct Tree {
    nodes: BTreeMap<String, Node>,
    watches: HashMap<String, Vec<Watcher>>,
    sessions: HashMap<u64, SessionStatus>,
    next_session: u64,
}

impl Default for Tree {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::new(Vec::new(), None));
        Self {
            nodes,
            watches: HashMap::new(),
            sessions: HashMap::new(),
            next_session: 1,
        }
    }
}

fn parent_of(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rsplit_once('/') {
        Some(("", _)) => Some("/"),
        Some((parent, _)) => Some(parent),
        None => None,
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

impl Tree {
    fn check(&self, session: u64) -> Result<(), CoordinationError> {
        match self.sessions.get(&session) {
            Some(SessionStatus::Connected) => Ok(()),
            Some(SessionStatus::Disconnected) => Err(CoordinationError::ConnectionLoss),
            Some(SessionStatus::Closed) => Err(CoordinationError::Closed),
            Some(SessionStatus::Expired) | None => Err(CoordinationError::SessionExpired),
        }
    }

    fn children(&self, path: &str) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|key| parent_of(key) == Some(path))
            .filter_map(|key| key.rsplit('/').next().map(str::to_string))
            .collect()
    }

    fn fire(&mut self, path: &str, event: WatchEvent) {
        for watcher in self.watches.remove(path).unwrap_or_default() {
            let _ = watcher.tx.send(event.clone());
        }
    }

    /// Forget watches nobody is listening to any more
    fn prune_watches(&mut self) {
        self.watches.retain(|_, watchers| {
            watchers.retain(|watcher| !watcher.tx.is_closed());
            !watchers.is_empty()
        });
    }

    fn insert(
        &mut self,
        path: String,
        data: Vec<u8>,
        owner: Option<u64>,
    ) -> Result<(), CoordinationError> {
        let parent = parent_of(&path).ok_or_else(|| CoordinationError::NodeExists(path.clone()))?;
        match self.nodes.get(parent) {
            None => return Err(CoordinationError::NoNode(parent.to_string())),
            Some(node) if node.ephemeral_owner.is_some() => {
                return Err(CoordinationError::Other(format!(
                    "ephemeral node {} cannot have children",
                    parent
                )))
            }
            Some(_) => {}
        }
        if self.nodes.contains_key(&path) {
            return Err(CoordinationError::NodeExists(path));
        }
        self.nodes.insert(path.clone(), Node::new(data, owner));
        self.fire(&path.clone(), WatchEvent::Created { path });
        Ok(())
    }

    fn remove(&mut self, path: &str, version: Option<i32>) -> Result<(), CoordinationError> {
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| CoordinationError::NoNode(path.to_string()))?;
        if let Some(expected) = version {
            if node.version != expected {
                return Err(CoordinationError::BadVersion(path.to_string()));
            }
        }
        if path == "/" || !self.children(path).is_empty() {
            return Err(CoordinationError::NotEmpty(path.to_string()));
        }
        self.nodes.remove(path);
        self.fire(
            path,
            WatchEvent::Deleted {
                path: path.to_string(),
            },
        );
        self.prune_watches();
        Ok(())
    }

    fn end_session(&mut self, session: u64, status: SessionStatus) -> bool {
        match self.sessions.get(&session) {
            Some(SessionStatus::Expired) | Some(SessionStatus::Closed) | None => return false,
            _ => {}
        }
        self.sessions.insert(session, status);

        let owned: Vec<String> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.ephemeral_owner == Some(session))
            .map(|(path, _)| path.clone())
            .collect();
        for path in owned {
            let _ = self.remove(&path, None);
        }

        for watchers in self.watches.values_mut() {
            let (mine, others): (Vec<_>, Vec<_>) =
                watchers.drain(..).partition(|w| w.session == session);
            *watchers = others;
            for watcher in mine {
                let _ = watcher.tx.send(WatchEvent::SessionLost);
            }
        }
        self.watches.retain(|_, watchers| !watchers.is_empty());
        true
    }
}

/// A shared namespace that many sessions can join
#[derive(Clone, Default)]
pub struct MemoryNamespace {
    tree: Arc<Mutex<Tree>>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a new connected session
    pub fn session(&self) -> MemorySession {
        let (events, _) = broadcast::channel(16);
        let id = {
            let mut tree = self.lock();
            let id = tree.next_session;
            tree.next_session += 1;
            tree.sessions.insert(id, SessionStatus::Connected);
            id
        };
        let _ = events.send(SessionEvent::Connected);
        MemorySession {
            namespace: self.clone(),
            id,
            events,
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.lock().nodes.contains_key(path)
    }

    /// Sorted child names, empty if the node does not exist
    pub fn children(&self, path: &str) -> Vec<String> {
        let mut names = self.lock().children(path);
        names.sort();
        names
    }

    /// Delete a node from outside any session (operator action)
    pub fn remove(&self, path: &str) -> Result<(), CoordinationError> {
        self.lock().remove(path, None)
    }

    /// Number of pending watches on a path
    pub fn watch_count(&self, path: &str) -> usize {
        self.lock().watches.get(path).map_or(0, Vec::len)
    }
}

/// One participant's session in a [`MemoryNamespace`]
#[derive(Clone)]
pub struct MemorySession {
    namespace: MemoryNamespace,
    id: u64,
    events: broadcast::Sender<SessionEvent>,
}

impl MemorySession {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn namespace(&self) -> &MemoryNamespace {
        &self.namespace
    }

    pub fn status(&self) -> SessionStatus {
        self.namespace
            .lock()
            .sessions
            .get(&self.id)
            .copied()
            .unwrap_or(SessionStatus::Expired)
    }

    /// Expire the session as the server would after a missed heartbeat window
    pub fn expire(&self) {
        if self.namespace.lock().end_session(self.id, SessionStatus::Expired) {
            let _ = self.events.send(SessionEvent::Expired);
        }
    }

    /// Drop connectivity without losing the session
    pub fn disconnect(&self) {
        let mut tree = self.namespace.lock();
        if tree.sessions.get(&self.id) == Some(&SessionStatus::Connected) {
            tree.sessions.insert(self.id, SessionStatus::Disconnected);
            drop(tree);
            let _ = self.events.send(SessionEvent::Disconnected);
        }
    }

    pub fn reconnect(&self) {
        let mut tree = self.namespace.lock();
        if tree.sessions.get(&self.id) == Some(&SessionStatus::Disconnected) {
            tree.sessions.insert(self.id, SessionStatus::Connected);
            drop(tree);
            let _ = self.events.send(SessionEvent::Connected);
        }
    }
}

#[async_trait]
impl Coordination for MemorySession {
    async fn create_sequential_ephemeral(
        &self,
        parent: &str,
        prefix: &str,
        payload: Vec<u8>,
    ) -> Result<String, CoordinationError> {
        let mut tree = self.namespace.lock();
        tree.check(self.id)?;
        let sequence = match tree.nodes.get_mut(parent) {
            Some(node) => {
                let sequence = node.next_sequence;
                node.next_sequence += 1;
                sequence
            }
            None => return Err(CoordinationError::NoNode(parent.to_string())),
        };
        let path = join(parent, &format!("{}{:010}", prefix, sequence));
        tree.insert(path.clone(), payload, Some(self.id))?;
        Ok(path)
    }

    async fn create_persistent_if_absent(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<(), CoordinationError> {
        if !path.starts_with('/') {
            return Err(CoordinationError::Other(format!(
                "path must be absolute: {}",
                path
            )));
        }
        let mut tree = self.namespace.lock();
        tree.check(self.id)?;

        let mut current = String::new();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for (i, segment) in segments.iter().enumerate() {
            current.push('/');
            current.push_str(segment);
            if tree.nodes.contains_key(&current) {
                continue;
            }
            let data = if i + 1 == segments.len() {
                payload.clone()
            } else {
                Vec::new()
            };
            tree.insert(current.clone(), data, None)?;
        }
        Ok(())
    }

    async fn get_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        let tree = self.namespace.lock();
        tree.check(self.id)?;
        if !tree.nodes.contains_key(path) {
            return Err(CoordinationError::NoNode(path.to_string()));
        }
        Ok(tree.children(path))
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        let tree = self.namespace.lock();
        tree.check(self.id)?;
        tree.nodes
            .get(path)
            .map(|node| node.data.clone())
            .ok_or_else(|| CoordinationError::NoNode(path.to_string()))
    }

    async fn exists_watch(&self, path: &str) -> Result<ExistsWatch, CoordinationError> {
        let mut tree = self.namespace.lock();
        tree.check(self.id)?;
        tree.prune_watches();
        let exists = tree.nodes.contains_key(path);
        let (tx, fired) = oneshot::channel();
        tree.watches
            .entry(path.to_string())
            .or_default()
            .push(Watcher {
                session: self.id,
                tx,
            });
        Ok(ExistsWatch { exists, fired })
    }

    async fn delete(&self, path: &str, version: Option<i32>) -> Result<(), CoordinationError> {
        let mut tree = self.namespace.lock();
        tree.check(self.id)?;
        tree.remove(path, version)
    }

    fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn close(&self) -> Result<(), CoordinationError> {
        if self.namespace.lock().end_session(self.id, SessionStatus::Closed) {
            let _ = self.events.send(SessionEvent::Closed);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
