// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ladder lock engine: drives acquisitions against a coordination service

mod error;
mod executor;
mod handle;
mod locker;
mod simulation;

pub use error::LockError;
pub use executor::{ExecuteError, Executor, Feedback};
pub use handle::LockHandle;
pub use locker::{with_lock, Locker, SiblingStatus};
pub use simulation::{simulate, SimulationConfig, SimulationReport, TimelineEntry};
