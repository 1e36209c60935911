// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acquisition state machine
//!
//! One `Acquisition` tracks a single attempt from registration to a terminal
//! state. Every asynchronous step (node creation, sibling listing, watch
//! registration, watch firing, timer expiry) comes back in as an
//! [`AcquireInput`], and the machine answers with the [`Effect`]s to run next.
//!
//! ```text
//! Unregistered -> Registering -> Evaluating -> Arming -> Waiting
//!                                    ^           |         |
//!                                    +-----------+---------+
//!                                    |
//!                              Granted | Abandoned
//! ```

use super::admission::{evaluate, AdmissionDecision, AdmissionError, SiblingSet};
use super::node::NodeName;
use super::request::{AcquireOptions, LockRequest};
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Why an attempt ended without the lock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbandonReason {
    /// Deadline passed before admission
    Timeout { waited: Duration },
    /// Predecessors kept vanishing before a watch could be set
    RaceLimitExceeded { attempts: u32 },
    /// Own node disappeared from the directory
    Lost,
    /// Session ended; every ephemeral registration is gone
    SessionExpired,
    /// The node could not be created
    RegistrationFailed { message: String },
}

impl std::fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbandonReason::Timeout { waited } => {
                write!(f, "timed out after {}ms", waited.as_millis())
            }
            AbandonReason::RaceLimitExceeded { attempts } => {
                write!(f, "predecessor raced away {} times in a row", attempts)
            }
            AbandonReason::Lost => write!(f, "registration disappeared"),
            AbandonReason::SessionExpired => write!(f, "session expired"),
            AbandonReason::RegistrationFailed { message } => {
                write!(f, "registration failed: {}", message)
            }
        }
    }
}

/// Where an attempt currently stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Nothing created yet
    Unregistered,
    /// Node creation in flight
    Registering,
    /// Sibling listing in flight
    Evaluating,
    /// Watch registration on `predecessor` in flight
    Arming { predecessor: NodeName },
    /// One watch outstanding on `predecessor`
    Waiting { predecessor: NodeName },
    Granted,
    Abandoned { reason: AbandonReason },
}

/// Inputs that drive an acquisition forward
#[derive(Clone, Debug)]
pub enum AcquireInput {
    /// Begin the attempt
    Start,
    /// The service created our node at `path`
    Registered {
        path: String,
        created_at: DateTime<Utc>,
    },
    /// Node creation failed for a non-connectivity reason
    RegistrationFailed { message: String },
    /// Fresh listing of the lock directory
    SiblingsRead { siblings: SiblingSet },
    /// Result of registering the existence watch on the predecessor
    WatchArmed { exists: bool },
    /// A watch fired for `path`
    WatchFired { path: String },
    /// The acquisition timer expired
    Deadline,
    /// The session ended
    SessionExpired,
}

/// A single lock acquisition attempt
#[derive(Clone, Debug)]
pub struct Acquisition {
    pub options: AcquireOptions,
    pub state: AcquisitionState,
    pub request: Option<LockRequest>,
    registered_at: Option<Instant>,
    timer_armed: bool,
    races: u32,
    evaluations: u32,
}

impl Acquisition {
    pub fn new(options: AcquireOptions) -> Self {
        Self {
            options,
            state: AcquisitionState::Unregistered,
            request: None,
            registered_at: None,
            timer_armed: false,
            races: 0,
            evaluations: 0,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self.state, AcquisitionState::Granted)
    }

    /// Granted and Abandoned are final
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            AcquisitionState::Granted | AcquisitionState::Abandoned { .. }
        )
    }

    pub fn abandon_reason(&self) -> Option<&AbandonReason> {
        match &self.state {
            AcquisitionState::Abandoned { reason } => Some(reason),
            _ => None,
        }
    }

    /// Sibling currently being watched, if any
    pub fn predecessor(&self) -> Option<&NodeName> {
        match &self.state {
            AcquisitionState::Arming { predecessor } | AcquisitionState::Waiting { predecessor } => {
                Some(predecessor)
            }
            _ => None,
        }
    }

    /// Number of admission checks run so far
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }

    /// Time left before the deadline, if a timeout is armed
    pub fn remaining(&self, clock: &impl Clock) -> Option<Duration> {
        let timeout = self.options.timeout?;
        let start = self.registered_at?;
        Some(timeout.saturating_sub(clock.since(start)))
    }

    /// Pure state transition function
    pub fn transition(&self, input: AcquireInput, clock: &impl Clock) -> (Acquisition, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match (&self.state, input) {
            (AcquisitionState::Unregistered, AcquireInput::Start) => {
                match self.options.mode.prefix_for(self.options.role) {
                    Ok(prefix) => {
                        next.state = AcquisitionState::Registering;
                        effects.push(Effect::CreateNode {
                            directory: self.options.directory.clone(),
                            prefix: prefix.to_string(),
                            owner: self.options.owner.clone(),
                            role: self.options.role,
                        });
                    }
                    Err(e) => {
                        next.abandon(
                            AbandonReason::RegistrationFailed {
                                message: e.to_string(),
                            },
                            &mut effects,
                        );
                    }
                }
            }

            (AcquisitionState::Registering, AcquireInput::Registered { path, created_at }) => {
                let parsed = self
                    .options
                    .directory
                    .child_name(&path)
                    .and_then(NodeName::parse);
                match parsed {
                    Ok(name) => {
                        next.request = Some(LockRequest {
                            directory: self.options.directory.clone(),
                            name: name.clone(),
                            role: self.options.role,
                            mode: self.options.mode,
                            owner: self.options.owner.clone(),
                            created_at,
                            ephemeral: true,
                        });
                        next.registered_at = Some(clock.now());
                        next.state = AcquisitionState::Evaluating;
                        effects.push(Effect::Emit(Event::LockRegistered {
                            directory: self.options.directory.to_string(),
                            node: name.to_string(),
                            role: self.options.role,
                        }));
                        if let Some(duration) = self.options.timeout {
                            next.timer_armed = true;
                            effects.push(Effect::ArmTimer { duration });
                        }
                        effects.push(Effect::ReadSiblings {
                            directory: self.options.directory.clone(),
                        });
                    }
                    Err(e) => {
                        // Whatever got created is not usable; take it back out
                        effects.push(Effect::DeleteNode { path });
                        next.abandon(
                            AbandonReason::RegistrationFailed {
                                message: e.to_string(),
                            },
                            &mut effects,
                        );
                    }
                }
            }

            (AcquisitionState::Registering, AcquireInput::RegistrationFailed { message }) => {
                next.abandon(AbandonReason::RegistrationFailed { message }, &mut effects);
            }

            (AcquisitionState::Evaluating, AcquireInput::SiblingsRead { siblings }) => {
                next.evaluations += 1;
                let Some(request) = &self.request else {
                    return (next, effects);
                };

                match evaluate(&siblings, &request.name, request.role) {
                    Ok(AdmissionDecision::Granted) => {
                        next.state = AcquisitionState::Granted;
                        if next.timer_armed {
                            next.timer_armed = false;
                            effects.push(Effect::DisarmTimer);
                        }
                        effects.push(Effect::Emit(Event::LockGranted {
                            directory: self.options.directory.to_string(),
                            node: request.name.to_string(),
                            role: request.role,
                            evaluations: next.evaluations,
                        }));
                    }
                    Ok(AdmissionDecision::MustWaitOn(predecessor)) => {
                        effects.push(Effect::WatchNode {
                            path: self.options.directory.join(predecessor.as_str()),
                        });
                        next.state = AcquisitionState::Arming { predecessor };
                    }
                    Err(AdmissionError::NotRegistered(_)) => {
                        next.abandon(AbandonReason::Lost, &mut effects);
                    }
                }
            }

            (AcquisitionState::Arming { predecessor }, AcquireInput::WatchArmed { exists }) => {
                let node = self.own_name();
                if exists {
                    next.races = 0;
                    next.state = AcquisitionState::Waiting {
                        predecessor: predecessor.clone(),
                    };
                    effects.push(Effect::Emit(Event::LockWaiting {
                        directory: self.options.directory.to_string(),
                        node,
                        predecessor: predecessor.to_string(),
                    }));
                } else {
                    next.races += 1;
                    if next.races > self.options.max_race_retries {
                        if let Some(request) = &self.request {
                            effects.push(Effect::DeleteNode {
                                path: request.path(),
                            });
                        }
                        next.abandon(
                            AbandonReason::RaceLimitExceeded {
                                attempts: next.races,
                            },
                            &mut effects,
                        );
                    } else {
                        next.state = AcquisitionState::Evaluating;
                        effects.push(Effect::Emit(Event::LockRace {
                            directory: self.options.directory.to_string(),
                            node,
                            predecessor: predecessor.to_string(),
                            attempt: next.races,
                        }));
                        effects.push(Effect::ReadSiblings {
                            directory: self.options.directory.clone(),
                        });
                    }
                }
            }

            (AcquisitionState::Waiting { predecessor }, AcquireInput::WatchFired { path }) => {
                // Watches from superseded subscriptions are ignored
                if path == self.options.directory.join(predecessor.as_str()) {
                    next.state = AcquisitionState::Evaluating;
                    effects.push(Effect::ReadSiblings {
                        directory: self.options.directory.clone(),
                    });
                }
            }

            (
                AcquisitionState::Evaluating
                | AcquisitionState::Arming { .. }
                | AcquisitionState::Waiting { .. },
                AcquireInput::Deadline,
            ) => {
                let waited = self
                    .registered_at
                    .map(|start| clock.since(start))
                    .unwrap_or_default();
                next.timer_armed = false;
                if let Some(request) = &self.request {
                    effects.push(Effect::DeleteNode {
                        path: request.path(),
                    });
                    effects.push(Effect::Emit(Event::LockTimedOut {
                        directory: self.options.directory.to_string(),
                        node: request.name.to_string(),
                        waited_ms: waited.as_millis() as u64,
                    }));
                }
                next.state = AcquisitionState::Abandoned {
                    reason: AbandonReason::Timeout { waited },
                };
            }

            (
                AcquisitionState::Registering
                | AcquisitionState::Evaluating
                | AcquisitionState::Arming { .. }
                | AcquisitionState::Waiting { .. },
                AcquireInput::SessionExpired,
            ) => {
                next.abandon(AbandonReason::SessionExpired, &mut effects);
            }

            _ => {
                // Late or irrelevant input (e.g. a timer firing after the grant)
            }
        }

        (next, effects)
    }

    fn own_name(&self) -> String {
        self.request
            .as_ref()
            .map(|r| r.name.to_string())
            .unwrap_or_default()
    }

    fn abandon(&mut self, reason: AbandonReason, effects: &mut Vec<Effect>) {
        if self.timer_armed {
            self.timer_armed = false;
            effects.push(Effect::DisarmTimer);
        }
        effects.push(Effect::Emit(Event::LockAbandoned {
            directory: self.options.directory.to_string(),
            node: self.request.as_ref().map(|r| r.name.to_string()),
            reason: reason.to_string(),
        }));
        self.state = AcquisitionState::Abandoned { reason };
    }
}

#[cfg(test)]
#[path = "acquisition_tests.rs"]
mod tests;
