// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ZooKeeper-backed coordination
//!
//! The client library is synchronous; every call runs on the blocking pool.

use super::{Coordination, CoordinationError, ExistsWatch, SessionEvent, WatchEvent};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use zookeeper::{
    Acl, CreateMode, KeeperState, WatchedEvent, WatchedEventType, Watcher, ZkError, ZooKeeper,
};

struct SessionWatcher {
    events: broadcast::Sender<SessionEvent>,
}

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        let mapped = match event.keeper_state {
            KeeperState::SyncConnected | KeeperState::ConnectedReadOnly => SessionEvent::Connected,
            KeeperState::Disconnected => SessionEvent::Disconnected,
            KeeperState::Expired | KeeperState::AuthFailed => SessionEvent::Expired,
            KeeperState::SaslAuthenticated => return,
        };
        tracing::debug!(state = ?event.keeper_state, "session state changed");
        let _ = self.events.send(mapped);
    }
}

fn map_error(err: ZkError, path: &str) -> CoordinationError {
    match err {
        ZkError::NoNode => CoordinationError::NoNode(path.to_string()),
        ZkError::NodeExists => CoordinationError::NodeExists(path.to_string()),
        ZkError::NotEmpty => CoordinationError::NotEmpty(path.to_string()),
        ZkError::BadVersion => CoordinationError::BadVersion(path.to_string()),
        ZkError::NoAuth | ZkError::AuthFailed => CoordinationError::NoAuth(path.to_string()),
        ZkError::ConnectionLoss | ZkError::OperationTimeout => CoordinationError::ConnectionLoss,
        ZkError::SessionExpired => CoordinationError::SessionExpired,
        other => CoordinationError::Other(format!("{:?} on {}", other, path)),
    }
}

fn map_watch(event: WatchedEvent, path: &str) -> WatchEvent {
    let path = event.path.unwrap_or_else(|| path.to_string());
    match event.event_type {
        WatchedEventType::NodeCreated => WatchEvent::Created { path },
        WatchedEventType::NodeDeleted => WatchEvent::Deleted { path },
        WatchedEventType::None => WatchEvent::SessionLost,
        _ => WatchEvent::Changed { path },
    }
}

/// Coordination over a live ZooKeeper ensemble
#[derive(Clone)]
pub struct ZooKeeperCoordination {
    client: Arc<ZooKeeper>,
    events: broadcast::Sender<SessionEvent>,
}

impl ZooKeeperCoordination {
    /// Connect to `hosts` (comma separated `host:port` list)
    pub async fn connect(hosts: &str, session_timeout: Duration) -> Result<Self, CoordinationError> {
        let (events, _) = broadcast::channel(16);
        let watcher = SessionWatcher {
            events: events.clone(),
        };
        let hosts = hosts.to_string();
        let client = tokio::task::spawn_blocking(move || {
            ZooKeeper::connect(&hosts, session_timeout, watcher)
                .map_err(|e| map_error(e, &hosts))
        })
        .await
        .map_err(|e| CoordinationError::Other(e.to_string()))??;

        Ok(Self {
            client: Arc::new(client),
            events,
        })
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, CoordinationError>
    where
        T: Send + 'static,
        F: FnOnce(&ZooKeeper) -> Result<T, CoordinationError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| CoordinationError::Other(e.to_string()))?
    }
}

#[async_trait]
impl Coordination for ZooKeeperCoordination {
    async fn create_sequential_ephemeral(
        &self,
        parent: &str,
        prefix: &str,
        payload: Vec<u8>,
    ) -> Result<String, CoordinationError> {
        let base = if parent == "/" {
            format!("/{}", prefix)
        } else {
            format!("{}/{}", parent, prefix)
        };
        self.blocking(move |zk| {
            zk.create(
                &base,
                payload,
                Acl::open_unsafe().clone(),
                CreateMode::EphemeralSequential,
            )
            .map_err(|e| map_error(e, &base))
        })
        .await
    }

    async fn create_persistent_if_absent(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<(), CoordinationError> {
        let path = path.to_string();
        self.blocking(move |zk| {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            let mut current = String::new();
            for (i, segment) in segments.iter().enumerate() {
                current.push('/');
                current.push_str(segment);
                let data = if i + 1 == segments.len() {
                    payload.clone()
                } else {
                    Vec::new()
                };
                match zk.create(
                    &current,
                    data,
                    Acl::open_unsafe().clone(),
                    CreateMode::Persistent,
                ) {
                    Ok(_) | Err(ZkError::NodeExists) => {}
                    Err(e) => return Err(map_error(e, &current)),
                }
            }
            Ok(())
        })
        .await
    }

    async fn get_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        let path = path.to_string();
        self.blocking(move |zk| zk.get_children(&path, false).map_err(|e| map_error(e, &path)))
            .await
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        let path = path.to_string();
        self.blocking(move |zk| {
            zk.get_data(&path, false)
                .map(|(data, _)| data)
                .map_err(|e| map_error(e, &path))
        })
        .await
    }

    async fn exists_watch(&self, path: &str) -> Result<ExistsWatch, CoordinationError> {
        let path = path.to_string();
        let (tx, fired) = oneshot::channel();
        let exists = self
            .blocking(move |zk| {
                let watched = path.clone();
                zk.exists_w(&path, move |event: WatchedEvent| {
                    let _ = tx.send(map_watch(event, &watched));
                })
                .map(|stat| stat.is_some())
                .map_err(|e| map_error(e, &path))
            })
            .await?;
        Ok(ExistsWatch { exists, fired })
    }

    async fn delete(&self, path: &str, version: Option<i32>) -> Result<(), CoordinationError> {
        let path = path.to_string();
        self.blocking(move |zk| zk.delete(&path, version).map_err(|e| map_error(e, &path)))
            .await
    }

    fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn close(&self) -> Result<(), CoordinationError> {
        self.blocking(|zk| zk.close().map_err(|e| map_error(e, "/")))
            .await?;
        let _ = self.events.send(SessionEvent::Closed);
        Ok(())
    }
}
