// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Held locks and their release

use crate::{Executor, LockError};
use ladder_adapters::Coordination;
use ladder_core::{Effect, Event, LockRequest};

/// A granted lock
///
/// Release explicitly with [`LockHandle::release`]. A handle dropped while
/// still held schedules a best-effort delete on the current tokio runtime;
/// if there is none, the node lives until the session ends.
pub struct LockHandle<C: Coordination> {
    executor: Executor<C>,
    request: LockRequest,
    released: bool,
}

impl<C: Coordination> LockHandle<C> {
    pub(crate) fn new(executor: Executor<C>, request: LockRequest) -> Self {
        Self {
            executor,
            request,
            released: false,
        }
    }

    pub fn request(&self) -> &LockRequest {
        &self.request
    }

    /// Full path of the registration node
    pub fn path(&self) -> String {
        self.request.path()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Delete the registration; calling again is a no-op
    pub async fn release(&mut self) -> Result<(), LockError> {
        if self.released {
            tracing::debug!(path = %self.request.path(), "already released");
            return Ok(());
        }

        self.executor
            .execute(Effect::DeleteNode {
                path: self.request.path(),
            })
            .await?;
        self.released = true;

        self.executor
            .execute(Effect::Emit(Event::LockReleased {
                directory: self.request.directory.to_string(),
                node: self.request.name.to_string(),
            }))
            .await?;
        Ok(())
    }
}

impl<C: Coordination> std::fmt::Debug for LockHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandle")
            .field("request", &self.request)
            .field("released", &self.released)
            .finish()
    }
}

impl<C: Coordination> Drop for LockHandle<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let path = self.request.path();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::warn!(path, "lock handle dropped while held, releasing");
                let coordination = self.executor.coordination().clone();
                runtime.spawn(async move {
                    if let Err(e) = coordination.delete(&path, None).await {
                        tracing::debug!(path, error = %e, "release on drop failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(path, "lock handle dropped outside a runtime; node remains until the session ends");
            }
        }
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
