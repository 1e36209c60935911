// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::coordination::{Coordination, CoordinationError, ExistsWatch, SessionEvent};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::Instrument;

/// Wrapper that adds tracing to any Coordination
#[derive(Clone)]
pub struct TracedCoordination<C> {
    inner: C,
}

impl<C> TracedCoordination<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: Coordination> Coordination for TracedCoordination<C> {
    async fn create_sequential_ephemeral(
        &self,
        parent: &str,
        prefix: &str,
        payload: Vec<u8>,
    ) -> Result<String, CoordinationError> {
        let span = tracing::info_span!("coordination.create_sequential", parent, prefix);
        async move {
            // Precondition: lock directories are absolute
            if !parent.starts_with('/') {
                tracing::error!("parent path is not absolute");
                return Err(CoordinationError::Other(format!(
                    "parent path is not absolute: {}",
                    parent
                )));
            }

            let start = std::time::Instant::now();
            let result = self
                .inner
                .create_sequential_ephemeral(parent, prefix, payload)
                .await;
            let elapsed = start.elapsed();

            match &result {
                Ok(path) => tracing::info!(
                    path,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "node created"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "create failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn create_persistent_if_absent(
        &self,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<(), CoordinationError> {
        let span = tracing::info_span!("coordination.ensure", path);
        async move {
            let result = self.inner.create_persistent_if_absent(path, payload).await;
            match &result {
                Ok(()) => tracing::debug!("directory present"),
                Err(e) => tracing::error!(error = %e, "ensure failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn get_children(&self, path: &str) -> Result<Vec<String>, CoordinationError> {
        let result = self.inner.get_children(path).await;
        tracing::trace!(
            path,
            count = result.as_ref().map(|v| v.len()).ok(),
            "listed children"
        );
        result
    }

    async fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        let result = self.inner.get_data(path).await;
        tracing::trace!(path, len = result.as_ref().map(|v| v.len()).ok(), "read data");
        result
    }

    async fn exists_watch(&self, path: &str) -> Result<ExistsWatch, CoordinationError> {
        let span = tracing::info_span!("coordination.watch", path);
        async move {
            let result = self.inner.exists_watch(path).await;
            match &result {
                Ok(watch) if watch.exists => tracing::debug!("watch armed"),
                Ok(_) => tracing::debug!("watched node already gone"),
                Err(e) => tracing::error!(error = %e, "watch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, path: &str, version: Option<i32>) -> Result<(), CoordinationError> {
        let span = tracing::info_span!("coordination.delete", path);
        async move {
            let result = self.inner.delete(path, version).await;
            // Deleting an already-gone node is routine on release and reclaim
            match &result {
                Ok(()) => tracing::info!("node deleted"),
                Err(CoordinationError::NoNode(_)) => tracing::debug!("node already gone"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.session_events()
    }

    async fn close(&self) -> Result<(), CoordinationError> {
        let result = self.inner.close().await;
        match &result {
            Ok(()) => tracing::info!("session closed"),
            Err(e) => tracing::warn!(error = %e, "close failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
