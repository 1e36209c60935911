// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ladder-core: pure lock protocol over sequential ephemeral nodes
//!
//! This crate provides:
//! - Node naming, lock directories, modes and roles
//! - The admission evaluator over sibling snapshots
//! - The acquisition state machine and the effects it requests
//! - Client configuration

pub mod clock;
pub mod config;
pub mod coordination;
pub mod effect;
pub mod participant;
pub mod traced;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, LockConfig};
pub use coordination::{
    evaluate, AbandonReason, Acquisition, AcquireInput, AcquireOptions, AcquisitionState,
    AdmissionDecision, AdmissionError, LockMode, LockPath, LockRequest, NodeError, NodeName, Role,
    SiblingSet,
};
pub use effect::{Effect, Event};
pub use participant::{NodePayload, ParticipantId};
pub use traced::TracedEffect;
