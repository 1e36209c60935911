// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for the acquisition state machine

use crate::coordination::{LockPath, Role};
use crate::participant::ParticipantId;
use crate::traced::TracedEffect;
use std::time::Duration;

/// Side effects the acquisition state machine requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Emit an event for observers
    Emit(Event),
    /// Create an ephemeral sequential node under the lock directory
    CreateNode {
        directory: LockPath,
        prefix: String,
        owner: ParticipantId,
        role: Role,
    },
    /// Fetch the current children of the lock directory
    ReadSiblings { directory: LockPath },
    /// Register a one-shot existence watch
    WatchNode { path: String },
    /// Delete a node, tolerating its absence
    DeleteNode { path: String },
    /// Start the acquisition timeout
    ArmTimer { duration: Duration },
    /// Cancel the acquisition timeout
    DisarmTimer,
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::CreateNode { .. } => "create_node",
            Effect::ReadSiblings { .. } => "read_siblings",
            Effect::WatchNode { .. } => "watch_node",
            Effect::DeleteNode { .. } => "delete_node",
            Effect::ArmTimer { .. } => "arm_timer",
            Effect::DisarmTimer => "disarm_timer",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![("event", event.name().to_string())],
            Effect::CreateNode {
                directory,
                prefix,
                owner,
                role,
            } => vec![
                ("directory", directory.to_string()),
                ("prefix", prefix.clone()),
                ("owner", owner.to_string()),
                ("role", role.to_string()),
            ],
            Effect::ReadSiblings { directory } => vec![("directory", directory.to_string())],
            Effect::WatchNode { path } | Effect::DeleteNode { path } => {
                vec![("path", path.clone())]
            }
            Effect::ArmTimer { duration } => {
                vec![("duration_ms", duration.as_millis().to_string())]
            }
            Effect::DisarmTimer => Vec::new(),
        }
    }
}

/// Events emitted as an acquisition progresses
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    LockRegistered {
        directory: String,
        node: String,
        role: Role,
    },
    LockWaiting {
        directory: String,
        node: String,
        predecessor: String,
    },
    /// Predecessor vanished before its watch was registered
    LockRace {
        directory: String,
        node: String,
        predecessor: String,
        attempt: u32,
    },
    LockGranted {
        directory: String,
        node: String,
        role: Role,
        evaluations: u32,
    },
    LockTimedOut {
        directory: String,
        node: String,
        waited_ms: u64,
    },
    LockAbandoned {
        directory: String,
        node: Option<String>,
        reason: String,
    },
    LockReleased {
        directory: String,
        node: String,
    },
}

impl Event {
    /// Event name in "category:action" form
    pub fn name(&self) -> &'static str {
        match self {
            Event::LockRegistered { .. } => "lock:registered",
            Event::LockWaiting { .. } => "lock:waiting",
            Event::LockRace { .. } => "lock:race",
            Event::LockGranted { .. } => "lock:granted",
            Event::LockTimedOut { .. } => "lock:timed_out",
            Event::LockAbandoned { .. } => "lock:abandoned",
            Event::LockReleased { .. } => "lock:released",
        }
    }

    pub fn directory(&self) -> &str {
        match self {
            Event::LockRegistered { directory, .. }
            | Event::LockWaiting { directory, .. }
            | Event::LockRace { directory, .. }
            | Event::LockGranted { directory, .. }
            | Event::LockTimedOut { directory, .. }
            | Event::LockAbandoned { directory, .. }
            | Event::LockReleased { directory, .. } => directory,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
