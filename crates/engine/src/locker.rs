// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous acquisition driver
//!
//! The [`Locker`] feeds an [`Acquisition`] state machine: it runs the
//! requested effects, queues the resulting inputs, and when nothing is left
//! to do it parks on whichever comes first of the predecessor watch, the
//! deadline, or a session event.

use crate::{Executor, Feedback, LockError, LockHandle};
use ladder_adapters::{Coordination, CoordinationError, SessionEvent, WatchEvent};
use ladder_core::{
    evaluate, AbandonReason, AcquireInput, Acquisition, AcquisitionState, AdmissionDecision,
    Clock, Effect, Event, LockConfig, NodePayload, ParticipantId, Role, SiblingSet, SystemClock,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::Instrument;

/// One registration as seen by a status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiblingStatus {
    pub node: String,
    pub sequence: u64,
    pub role: Role,
    /// From the node payload; `None` for nodes written by other clients
    pub owner: Option<ParticipantId>,
    pub granted: bool,
    pub waiting_on: Option<String>,
}

/// Acquires locks in one directory on behalf of one participant
pub struct Locker<C, K = SystemClock> {
    executor: Executor<C>,
    config: LockConfig,
    owner: ParticipantId,
    clock: K,
}

impl<C: Coordination> Locker<C, SystemClock> {
    pub fn new(coordination: C, config: LockConfig) -> Result<Self, LockError> {
        Self::with_clock(coordination, config, SystemClock)
    }
}

impl<C: Coordination, K: Clock> Locker<C, K> {
    pub fn with_clock(coordination: C, config: LockConfig, clock: K) -> Result<Self, LockError> {
        config.validate()?;
        Ok(Self {
            executor: Executor::new(coordination),
            config,
            owner: ParticipantId::random(),
            clock,
        })
    }

    pub fn with_owner(mut self, owner: ParticipantId) -> Self {
        self.owner = owner;
        self
    }

    /// Forward lock events to `tx` (in addition to logging them)
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> Self {
        self.executor = self.executor.with_events(tx);
        self
    }

    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn coordination(&self) -> &C {
        self.executor.coordination()
    }

    /// Create the lock directory (and its ancestors) if missing
    pub async fn ensure_directory(&self) -> Result<(), LockError> {
        self.coordination()
            .create_persistent_if_absent(self.config.directory.as_str(), Vec::new())
            .await
            .map_err(LockError::from)
    }

    /// Wait until granted, the deadline passes, or the session ends
    pub async fn acquire(&self, role: Role) -> Result<LockHandle<C>, LockError> {
        let span = tracing::info_span!("acquire", directory = %self.config.directory, %role);
        self.drive(role, true).instrument(span).await
    }

    /// Register and evaluate once; withdraw and fail with `WouldBlock` if not granted
    pub async fn try_acquire(&self, role: Role) -> Result<LockHandle<C>, LockError> {
        let span = tracing::info_span!("try_acquire", directory = %self.config.directory, %role);
        self.drive(role, false).instrument(span).await
    }

    /// Snapshot of every registration and whether it would be admitted now
    pub async fn siblings(&self) -> Result<Vec<SiblingStatus>, LockError> {
        let coordination = self.coordination();
        let directory = &self.config.directory;
        let children = match coordination.get_children(directory.as_str()).await {
            Ok(children) => children,
            Err(CoordinationError::NoNode(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let set = SiblingSet::from_children(children);
        let mut statuses = Vec::with_capacity(set.len());
        for name in set.names() {
            let role = SiblingSet::role_of(name, self.config.mode);
            let decision = evaluate(&set, name, role).ok();
            let owner = match coordination.get_data(&directory.join(name.as_str())).await {
                Ok(bytes) => NodePayload::from_bytes(&bytes).map(|payload| payload.owner),
                // Released between listing and reading
                Err(CoordinationError::NoNode(_)) => None,
                Err(e) => return Err(e.into()),
            };
            statuses.push(SiblingStatus {
                node: name.to_string(),
                sequence: name.sequence(),
                role,
                owner,
                granted: decision == Some(AdmissionDecision::Granted),
                waiting_on: match decision {
                    Some(AdmissionDecision::MustWaitOn(predecessor)) => {
                        Some(predecessor.to_string())
                    }
                    _ => None,
                },
            });
        }
        Ok(statuses)
    }

    /// End the session; every registration it owns goes with it
    pub async fn close(&self) -> Result<(), LockError> {
        self.coordination().close().await.map_err(LockError::from)
    }

    async fn drive(&self, role: Role, wait: bool) -> Result<LockHandle<C>, LockError> {
        let options = self.config.acquire_options_for(self.owner.clone(), role);
        let mut session = self.coordination().session_events();
        let mut acquisition = Acquisition::new(options);
        let mut inputs = VecDeque::from([AcquireInput::Start]);
        let mut watch: Option<(String, oneshot::Receiver<WatchEvent>)> = None;
        let mut timer_armed = false;

        loop {
            while let Some(input) = inputs.pop_front() {
                let (next, effects) = acquisition.transition(input, &self.clock);
                acquisition = next;

                if !wait && matches!(acquisition.state, AcquisitionState::Arming { .. }) {
                    return Err(self.withdraw(&acquisition, &mut session).await);
                }

                for effect in effects {
                    match self.executor.execute(effect).await {
                        Ok(Feedback::Done) => {}
                        Ok(Feedback::Input(input)) => inputs.push_back(input),
                        Ok(Feedback::Watch {
                            path,
                            exists,
                            fired,
                        }) => {
                            watch = Some((path, fired));
                            inputs.push_back(AcquireInput::WatchArmed { exists });
                        }
                        Ok(Feedback::ArmTimer(_)) => timer_armed = true,
                        Ok(Feedback::DisarmTimer) => timer_armed = false,
                        Err(e) => {
                            self.abort(&acquisition, &mut session).await;
                            return Err(e.into());
                        }
                    }
                }
            }

            match &acquisition.state {
                AcquisitionState::Granted => {
                    return match acquisition.request {
                        Some(request) => Ok(LockHandle::new(self.executor.clone(), request)),
                        None => Err(LockError::Lost {
                            path: self.config.directory.to_string(),
                        }),
                    };
                }
                AcquisitionState::Abandoned { reason } => {
                    return Err(self.abandoned(&acquisition, reason));
                }
                _ => {}
            }

            let remaining = if timer_armed {
                acquisition.remaining(&self.clock)
            } else {
                None
            };

            tokio::select! {
                (path, fired) = next_watch(&mut watch) => {
                    watch = None;
                    match fired {
                        Ok(WatchEvent::SessionLost) | Err(_) => {
                            inputs.push_back(AcquireInput::SessionExpired)
                        }
                        Ok(event) => {
                            tracing::debug!(?event, "watch fired");
                            inputs.push_back(AcquireInput::WatchFired { path });
                        }
                    }
                }
                _ = sleep_for(remaining) => {
                    inputs.push_back(AcquireInput::Deadline);
                }
                event = session.recv() => match event {
                    Ok(SessionEvent::Expired | SessionEvent::Closed) | Err(RecvError::Closed) => {
                        inputs.push_back(AcquireInput::SessionExpired);
                    }
                    Ok(SessionEvent::Disconnected) => {
                        tracing::warn!("coordination session disconnected while waiting");
                    }
                    Ok(SessionEvent::Connected) => {
                        tracing::debug!("coordination session reconnected");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "session events lagged");
                    }
                },
            }
        }
    }

    /// Undo a registration that will not be waited on
    async fn withdraw(
        &self,
        acquisition: &Acquisition,
        session: &mut broadcast::Receiver<SessionEvent>,
    ) -> LockError {
        if let Some(request) = &acquisition.request {
            tracing::debug!(path = %request.path(), "lock held, withdrawing");
            if let Err(e) = self
                .executor
                .execute(Effect::DeleteNode {
                    path: request.path(),
                })
                .await
            {
                self.abort(acquisition, session).await;
                return e.into();
            }
        }
        LockError::WouldBlock {
            directory: self.config.directory.to_string(),
        }
    }

    /// Take the registration out of the queue after the service failed mid-attempt
    ///
    /// While the session is only disconnected its node survives, so the delete
    /// is retried on every reconnect. If the session neither reconnects nor
    /// ends within the session timeout it is closed, which takes the node with it.
    async fn abort(
        &self,
        acquisition: &Acquisition,
        session: &mut broadcast::Receiver<SessionEvent>,
    ) {
        let Some(request) = &acquisition.request else {
            return;
        };
        let path = request.path();
        let deadline = tokio::time::Instant::now() + self.config.session_timeout;

        loop {
            match self.coordination().delete(&path, None).await {
                Ok(()) | Err(CoordinationError::NoNode(_)) => return,
                Err(CoordinationError::ConnectionLoss) => {}
                Err(e) => {
                    // An ended session takes its ephemeral nodes with it
                    tracing::debug!(%path, error = %e, "cleanup after failure did not complete");
                    return;
                }
            }

            tracing::debug!(%path, "cleanup waiting for the session to reconnect");
            match tokio::time::timeout_at(deadline, reconnected(session)).await {
                Ok(true) => continue,
                Ok(false) => return,
                Err(_) => {
                    tracing::warn!(%path, "session did not reconnect, closing it to release the node");
                    if let Err(e) = self.coordination().close().await {
                        tracing::warn!(%path, error = %e, "closing the session failed");
                    }
                    return;
                }
            }
        }
    }

    fn abandoned(&self, acquisition: &Acquisition, reason: &AbandonReason) -> LockError {
        let path = acquisition
            .request
            .as_ref()
            .map(|request| request.path())
            .unwrap_or_else(|| self.config.directory.to_string());
        match reason {
            AbandonReason::Timeout { waited } => LockError::AcquisitionTimeout {
                path,
                waited: *waited,
            },
            AbandonReason::RaceLimitExceeded { attempts } => LockError::RaceLimitExceeded {
                path,
                attempts: *attempts,
            },
            AbandonReason::Lost => LockError::Lost { path },
            AbandonReason::SessionExpired => {
                LockError::Connectivity(CoordinationError::SessionExpired)
            }
            AbandonReason::RegistrationFailed { message } => {
                LockError::Registration(message.clone())
            }
        }
    }
}

async fn next_watch(
    watch: &mut Option<(String, oneshot::Receiver<WatchEvent>)>,
) -> (String, Result<WatchEvent, oneshot::error::RecvError>) {
    match watch {
        Some((path, fired)) => {
            let result = fired.await;
            (path.clone(), result)
        }
        None => std::future::pending().await,
    }
}

/// True once the session is back, false once it has ended for good
async fn reconnected(session: &mut broadcast::Receiver<SessionEvent>) -> bool {
    loop {
        match session.recv().await {
            Ok(SessionEvent::Connected) => return true,
            Ok(SessionEvent::Expired | SessionEvent::Closed) | Err(RecvError::Closed) => {
                return false
            }
            Ok(SessionEvent::Disconnected) | Err(RecvError::Lagged(_)) => {}
        }
    }
}

async fn sleep_for(remaining: Option<Duration>) {
    match remaining {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Run `work` while holding the lock, releasing it afterwards
pub async fn with_lock<C, K, F, T>(locker: &Locker<C, K>, role: Role, work: F) -> Result<T, LockError>
where
    C: Coordination,
    K: Clock,
    F: Future<Output = T>,
{
    let mut handle = locker.acquire(role).await?;
    let output = work.await;
    handle.release().await?;
    Ok(output)
}

#[cfg(test)]
#[path = "locker_tests.rs"]
mod tests;
