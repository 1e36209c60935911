// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specifications for the ladder CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/logging.rs"]
mod cli_logging;

// lock/
#[path = "specs/lock/hold.rs"]
mod lock_hold;
#[path = "specs/lock/run.rs"]
mod lock_run;
#[path = "specs/lock/simulate.rs"]
mod lock_simulate;
#[path = "specs/lock/status.rs"]
mod lock_status;
#[path = "specs/lock/try_acquire.rs"]
mod lock_try;
