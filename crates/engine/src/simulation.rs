// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process contention simulation
//!
//! Runs a crowd of readers and writers against one [`MemoryNamespace`], each
//! with its own session, and checks at every grant that no writer ever shares
//! the lock.

use crate::{LockError, Locker};
use ladder_adapters::{CoordinationError, MemoryNamespace, TracedCoordination};
use ladder_core::{LockConfig, LockMode, LockPath, NodeError, ParticipantId, Role};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Shape of one simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub directory: LockPath,
    pub mode: LockMode,
    pub writers: usize,
    pub readers: usize,
    /// How long each participant holds the lock once granted
    pub hold: Duration,
    pub timeout: Option<Duration>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            directory: LockPath::default(),
            mode: LockMode::ReadWrite,
            writers: 2,
            readers: 3,
            hold: Duration::from_millis(20),
            timeout: None,
        }
    }
}

/// One participant's admission, in milliseconds since the run started
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub participant: String,
    pub role: Role,
    pub node: String,
    pub granted_at_ms: u64,
    pub released_at_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    /// Admissions ordered by grant time
    pub timeline: Vec<TimelineEntry>,
    /// Participants whose attempt hit the deadline
    pub timed_out: Vec<String>,
    /// Exclusion breaches observed at grant time
    pub violations: Vec<String>,
    pub max_concurrent_readers: usize,
}

impl SimulationReport {
    pub fn is_exclusive(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Default)]
struct Occupancy {
    exclusive: usize,
    shared: usize,
    max_shared: usize,
    violations: Vec<String>,
}

impl Occupancy {
    fn enter(&mut self, participant: &str, role: Role) {
        match role {
            Role::Exclusive => {
                if self.exclusive + self.shared > 0 {
                    self.violations.push(format!(
                        "{} granted exclusive access alongside {} writer(s) and {} reader(s)",
                        participant, self.exclusive, self.shared
                    ));
                }
                self.exclusive += 1;
            }
            Role::Shared => {
                if self.exclusive > 0 {
                    self.violations.push(format!(
                        "{} granted shared access alongside {} writer(s)",
                        participant, self.exclusive
                    ));
                }
                self.shared += 1;
                self.max_shared = self.max_shared.max(self.shared);
            }
        }
    }

    fn leave(&mut self, role: Role) {
        match role {
            Role::Exclusive => self.exclusive = self.exclusive.saturating_sub(1),
            Role::Shared => self.shared = self.shared.saturating_sub(1),
        }
    }
}

enum Outcome {
    Granted(TimelineEntry),
    TimedOut(String),
}

struct Participant {
    name: String,
    role: Role,
    config: LockConfig,
    hold: Duration,
    occupancy: Arc<Mutex<Occupancy>>,
    started: Instant,
}

impl Participant {
    async fn run(self, namespace: MemoryNamespace) -> Result<Outcome, LockError> {
        let coordination = TracedCoordination::new(namespace.session());
        let locker = Locker::new(coordination, self.config.clone())?
            .with_owner(ParticipantId::new(self.name.clone()));

        let mut handle = match locker.acquire(self.role).await {
            Ok(handle) => handle,
            Err(LockError::AcquisitionTimeout { .. }) => {
                tracing::info!(participant = %self.name, "timed out");
                return Ok(Outcome::TimedOut(self.name));
            }
            Err(e) => return Err(e),
        };

        let granted_at = self.started.elapsed();
        self.occupy(|o| o.enter(&self.name, self.role));
        tokio::time::sleep(self.hold).await;
        self.occupy(|o| o.leave(self.role));
        let released_at = self.started.elapsed();

        handle.release().await?;
        locker.close().await?;

        Ok(Outcome::Granted(TimelineEntry {
            participant: self.name,
            role: self.role,
            node: handle.request().name.to_string(),
            granted_at_ms: granted_at.as_millis() as u64,
            released_at_ms: released_at.as_millis() as u64,
        }))
    }

    fn occupy(&self, f: impl FnOnce(&mut Occupancy)) {
        f(&mut self.occupancy.lock().unwrap_or_else(|e| e.into_inner()));
    }
}

/// Writers and readers alternate so registrations interleave
fn cast(writers: usize, readers: usize) -> Vec<(String, Role)> {
    let mut cast = Vec::with_capacity(writers + readers);
    for i in 0..writers.max(readers) {
        if i < writers {
            cast.push((format!("writer-{}", i + 1), Role::Exclusive));
        }
        if i < readers {
            cast.push((format!("reader-{}", i + 1), Role::Shared));
        }
    }
    cast
}

/// Run every participant to completion and report what happened
pub async fn simulate(config: SimulationConfig) -> Result<SimulationReport, LockError> {
    if config.readers > 0 && config.mode == LockMode::Mutex {
        return Err(LockError::Config(NodeError::SharedRoleInMutexMode.into()));
    }

    let lock_config = LockConfig::new(config.directory.clone())
        .with_mode(config.mode)
        .with_timeout(config.timeout);
    lock_config.validate()?;

    let namespace = MemoryNamespace::new();
    let setup = Locker::new(namespace.session(), lock_config.clone())?;
    setup.ensure_directory().await?;
    setup.close().await?;

    let occupancy = Arc::new(Mutex::new(Occupancy::default()));
    let started = Instant::now();
    let mut tasks = JoinSet::new();
    for (name, role) in cast(config.writers, config.readers) {
        let participant = Participant {
            name,
            role,
            config: lock_config.clone(),
            hold: config.hold,
            occupancy: Arc::clone(&occupancy),
            started,
        };
        tasks.spawn(participant.run(namespace.clone()));
    }

    let mut report = SimulationReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(Outcome::Granted(entry))) => report.timeline.push(entry),
            Ok(Ok(Outcome::TimedOut(name))) => report.timed_out.push(name),
            Ok(Err(e)) => return Err(e),
            Err(e) => {
                return Err(LockError::Coordination(CoordinationError::Other(
                    e.to_string(),
                )))
            }
        }
    }

    report
        .timeline
        .sort_by_key(|entry| (entry.granted_at_ms, entry.node.clone()));
    report.timed_out.sort();

    let occupancy = occupancy.lock().unwrap_or_else(|e| e.into_inner());
    report.violations = occupancy.violations.clone();
    report.max_concurrent_readers = occupancy.max_shared;

    tracing::info!(
        granted = report.timeline.len(),
        timed_out = report.timed_out.len(),
        violations = report.violations.len(),
        "simulation finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
