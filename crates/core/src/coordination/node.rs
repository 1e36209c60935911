// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock directory paths, sequenced node names, and registration roles
//!
//! The coordination service appends a zero-padded sequence number to every
//! sequential node. Ordering between siblings is defined by that number alone,
//! so nodes with different prefixes (`read_`, `write_`) interleave correctly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix for pure mutual-exclusion registrations
pub const LOCK_PREFIX: &str = "lock_";
/// Prefix for exclusive registrations in read/write mode
pub const WRITE_PREFIX: &str = "write_";
/// Prefix for shared registrations in read/write mode
pub const READ_PREFIX: &str = "read_";

/// Errors from parsing paths, modes, and roles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("lock path must be absolute: {0}")]
    NotAbsolute(String),
    #[error("lock path must not end with '/': {0}")]
    TrailingSlash(String),
    #[error("lock path contains an empty segment: {0}")]
    EmptySegment(String),
    #[error("path {path} is not a child of {parent}")]
    NotAChild { parent: String, path: String },
    #[error("no sequence number in node name: {0}")]
    MissingSequence(String),
    #[error("unknown role: {0} (expected exclusive or shared)")]
    UnknownRole(String),
    #[error("unknown lock mode: {0} (expected mutex or read-write)")]
    UnknownMode(String),
    #[error("shared role requires read-write mode")]
    SharedRoleInMutexMode,
}

/// How registrations under a directory are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockMode {
    /// Every registration excludes every other
    #[default]
    Mutex,
    /// Readers share, writers exclude
    ReadWrite,
}

impl LockMode {
    /// Node name prefix for a registration with the given role
    pub fn prefix_for(self, role: Role) -> Result<&'static str, NodeError> {
        match (self, role) {
            (LockMode::Mutex, Role::Exclusive) => Ok(LOCK_PREFIX),
            (LockMode::Mutex, Role::Shared) => Err(NodeError::SharedRoleInMutexMode),
            (LockMode::ReadWrite, Role::Exclusive) => Ok(WRITE_PREFIX),
            (LockMode::ReadWrite, Role::Shared) => Ok(READ_PREFIX),
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Mutex => write!(f, "mutex"),
            LockMode::ReadWrite => write!(f, "read-write"),
        }
    }
}

impl FromStr for LockMode {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mutex" => Ok(LockMode::Mutex),
            "read-write" | "rw" => Ok(LockMode::ReadWrite),
            other => Err(NodeError::UnknownMode(other.to_string())),
        }
    }
}

/// What a participant is asking for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sole access (writer)
    #[default]
    Exclusive,
    /// Access alongside other shared holders (reader)
    Shared,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Exclusive => write!(f, "exclusive"),
            Role::Shared => write!(f, "shared"),
        }
    }
}

impl FromStr for Role {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclusive" | "write" => Ok(Role::Exclusive),
            "shared" | "read" => Ok(Role::Shared),
            other => Err(NodeError::UnknownRole(other.to_string())),
        }
    }
}

/// A validated absolute directory path in the coordination namespace
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LockPath(String);

impl LockPath {
    pub fn new(path: impl Into<String>) -> Result<Self, NodeError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(NodeError::NotAbsolute(path));
        }
        if path == "/" {
            return Ok(Self(path));
        }
        if path.ends_with('/') {
            return Err(NodeError::TrailingSlash(path));
        }
        if path[1..].split('/').any(str::is_empty) {
            return Err(NodeError::EmptySegment(path));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full path of a child node
    pub fn join(&self, child: &str) -> String {
        if self.0 == "/" {
            format!("/{}", child)
        } else {
            format!("{}/{}", self.0, child)
        }
    }

    /// Child name of a full path directly under this directory
    pub fn child_name<'a>(&self, full: &'a str) -> Result<&'a str, NodeError> {
        let rest = if self.0 == "/" {
            full.strip_prefix('/')
        } else {
            full.strip_prefix(self.0.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        };
        match rest {
            Some(name) if !name.is_empty() && !name.contains('/') => Ok(name),
            _ => Err(NodeError::NotAChild {
                parent: self.0.clone(),
                path: full.to_string(),
            }),
        }
    }

    /// Ancestors from the top down, excluding the root and including self
    pub fn ancestry(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        for segment in self.0.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            out.push(current.clone());
        }
        out
    }
}

impl Default for LockPath {
    fn default() -> Self {
        Self("/locks".to_string())
    }
}

impl TryFrom<String> for LockPath {
    type Error = NodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LockPath> for String {
    fn from(value: LockPath) -> Self {
        value.0
    }
}

impl fmt::Display for LockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sibling name carrying a service-assigned sequence number
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName {
    raw: String,
    sequence: u64,
}

impl NodeName {
    /// Parse a child name, splitting off the trailing decimal sequence
    pub fn parse(raw: &str) -> Result<Self, NodeError> {
        let digits = raw.bytes().rev().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(NodeError::MissingSequence(raw.to_string()));
        }
        let sequence = raw[raw.len() - digits..]
            .parse::<u64>()
            .map_err(|_| NodeError::MissingSequence(raw.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            sequence,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Everything before the sequence digits
    pub fn prefix(&self) -> &str {
        let digits = self.raw.bytes().rev().take_while(u8::is_ascii_digit).count();
        &self.raw[..self.raw.len() - digits]
    }

    /// Role this registration holds under read/write semantics
    ///
    /// Anything that is not explicitly a reader excludes.
    pub fn role(&self) -> Role {
        if self.prefix() == READ_PREFIX {
            Role::Shared
        } else {
            Role::Exclusive
        }
    }
}

impl Ord for NodeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence
            .cmp(&other.sequence)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for NodeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for NodeName {
    type Error = NodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodeName> for String {
    fn from(value: NodeName) -> Self {
        value.raw
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
