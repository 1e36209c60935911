// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Participant identity and the payload stored in each registration node

use crate::coordination::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one participant process (or one logical client within it)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh UUID-based identity
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data written into a registration node
///
/// Purely informational. Admission never reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePayload {
    pub owner: ParticipantId,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl NodePayload {
    pub fn new(owner: ParticipantId, role: Role) -> Self {
        Self {
            owner,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode a payload; nodes written by other clients may hold anything
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}
