// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use ladder_adapters::{Coordination, CoordinationError, WatchEvent};
use ladder_core::{AcquireInput, Effect, Event, NodePayload, SiblingSet};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("coordination error: {0}")]
    Coordination(#[from] CoordinationError),
}

/// What running one effect hands back to the driver
#[derive(Debug)]
pub enum Feedback {
    /// Nothing to feed back
    Done,
    /// Feed this input back into the state machine
    Input(AcquireInput),
    /// A watch was registered; `fired` resolves when it triggers
    Watch {
        path: String,
        exists: bool,
        fired: oneshot::Receiver<WatchEvent>,
    },
    ArmTimer(Duration),
    DisarmTimer,
}

/// Executes effects against the coordination service
#[derive(Clone)]
pub struct Executor<C> {
    coordination: C,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl<C: Coordination> Executor<C> {
    pub fn new(coordination: C) -> Self {
        Self {
            coordination,
            events: None,
        }
    }

    /// Forward every emitted event to `tx`
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn coordination(&self) -> &C {
        &self.coordination
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<Feedback, ExecuteError> {
        use ladder_core::TracedEffect;

        let op_name = effect.name();
        let span = tracing::debug_span!("effect", effect = op_name);

        async move {
            tracing::debug!(fields = ?effect.fields(), "executing");

            let start = std::time::Instant::now();
            let result = self.execute_inner(effect).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(_) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn execute_inner(&self, effect: Effect) -> Result<Feedback, ExecuteError> {
        match effect {
            Effect::Emit(event) => {
                self.emit(event);
                Ok(Feedback::Done)
            }

            Effect::CreateNode {
                directory,
                prefix,
                owner,
                role,
            } => {
                let payload = NodePayload::new(owner, role);
                match self
                    .coordination
                    .create_sequential_ephemeral(directory.as_str(), &prefix, payload.to_bytes())
                    .await
                {
                    Ok(path) => Ok(Feedback::Input(AcquireInput::Registered {
                        path,
                        created_at: payload.created_at,
                    })),
                    Err(e) if e.is_connectivity() => Err(e.into()),
                    Err(e) => Ok(Feedback::Input(AcquireInput::RegistrationFailed {
                        message: e.to_string(),
                    })),
                }
            }

            Effect::ReadSiblings { directory } => {
                let children = match self.coordination.get_children(directory.as_str()).await {
                    Ok(children) => children,
                    // Directory removed underneath us; our node went with it
                    Err(CoordinationError::NoNode(_)) => Vec::new(),
                    Err(e) => return Err(e.into()),
                };
                Ok(Feedback::Input(AcquireInput::SiblingsRead {
                    siblings: SiblingSet::from_children(children),
                }))
            }

            Effect::WatchNode { path } => {
                let watch = self.coordination.exists_watch(&path).await?;
                Ok(Feedback::Watch {
                    path,
                    exists: watch.exists,
                    fired: watch.fired,
                })
            }

            Effect::DeleteNode { path } => match self.coordination.delete(&path, None).await {
                Ok(()) | Err(CoordinationError::NoNode(_)) => Ok(Feedback::Done),
                Err(e) => Err(e.into()),
            },

            Effect::ArmTimer { duration } => Ok(Feedback::ArmTimer(duration)),

            Effect::DisarmTimer => Ok(Feedback::DisarmTimer),
        }
    }

    fn emit(&self, event: Event) {
        tracing::info!(event = event.name(), directory = event.directory(), ?event, "lock event");
        if let Some(tx) = &self.events {
            if let Err(unsent) = tx.send(event) {
                tracing::trace!(event = unsent.0.name(), "event subscriber gone, event dropped");
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
