// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock coordination over sequential ephemeral nodes
//!
//! This module provides:
//! - **Node naming** - Directory paths, sequenced names, modes and roles
//! - **Admission** - Pure evaluation of a sibling snapshot
//! - **Acquisition** - The registration/watch/timeout state machine

pub mod acquisition;
pub mod admission;
pub mod node;
pub mod request;

pub use acquisition::{AbandonReason, Acquisition, AcquireInput, AcquisitionState};
pub use admission::{evaluate, AdmissionDecision, AdmissionError, SiblingSet};
pub use node::{LockMode, LockPath, NodeError, NodeName, Role, LOCK_PREFIX, READ_PREFIX, WRITE_PREFIX};
pub use request::{AcquireOptions, LockRequest};
