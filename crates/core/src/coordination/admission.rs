// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission evaluation over a snapshot of sibling registrations
//!
//! Evaluation is a pure function of the snapshot. Callers must take a fresh
//! snapshot after every watch event; a cached one is never trusted.

use super::node::{LockMode, NodeName, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sorted registrations under one lock directory at one observation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingSet {
    names: Vec<NodeName>,
}

impl SiblingSet {
    /// Build from raw child names; names without a sequence number are skipped
    pub fn from_children<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<NodeName> = children
            .into_iter()
            .filter_map(|child| NodeName::parse(child.as_ref()).ok())
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn names(&self) -> &[NodeName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &NodeName) -> Option<usize> {
        self.names.binary_search(name).ok()
    }

    pub fn contains(&self, name: &NodeName) -> bool {
        self.position(name).is_some()
    }

    /// Snapshot with one registration removed
    pub fn without(&self, name: &NodeName) -> Self {
        Self {
            names: self.names.iter().filter(|n| *n != name).cloned().collect(),
        }
    }

    /// Role a sibling holds under the given mode
    pub fn role_of(name: &NodeName, mode: LockMode) -> Role {
        match mode {
            LockMode::Mutex => Role::Exclusive,
            LockMode::ReadWrite => name.role(),
        }
    }

    /// Registrations that would be admitted right now
    pub fn granted(&self, mode: LockMode) -> Vec<&NodeName> {
        self.names
            .iter()
            .filter(|name| {
                matches!(
                    evaluate(self, name, Self::role_of(name, mode)),
                    Ok(AdmissionDecision::Granted)
                )
            })
            .collect()
    }
}

/// Outcome of one admission check
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionDecision {
    /// The participant holds the lock
    Granted,
    /// The participant waits for this sibling to disappear
    MustWaitOn(NodeName),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Own node is absent from the snapshot (deleted, or its session expired)
    #[error("registration {0} is not present in the lock directory")]
    NotRegistered(NodeName),
}

/// Decide whether `own` holds the lock given the current siblings
///
/// Exclusive registrations are admitted only at the head of the queue and
/// otherwise wait on their immediate predecessor. Shared registrations are
/// admitted when no exclusive registration precedes them and otherwise wait
/// on the nearest preceding exclusive one.
pub fn evaluate(
    siblings: &SiblingSet,
    own: &NodeName,
    role: Role,
) -> Result<AdmissionDecision, AdmissionError> {
    let index = siblings
        .position(own)
        .ok_or_else(|| AdmissionError::NotRegistered(own.clone()))?;
    let ahead = &siblings.names()[..index];

    let blocker = match role {
        Role::Exclusive => ahead.last(),
        Role::Shared => ahead
            .iter()
            .rev()
            .find(|name| name.role() == Role::Exclusive),
    };

    Ok(match blocker {
        None => AdmissionDecision::Granted,
        Some(name) => AdmissionDecision::MustWaitOn(name.clone()),
    })
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
