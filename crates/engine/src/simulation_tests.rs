// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn run(writers: usize, readers: usize) -> SimulationConfig {
    SimulationConfig {
        writers,
        readers,
        hold: Duration::from_millis(5),
        ..SimulationConfig::default()
    }
}

#[parameterized(
    writers_only = { 4, 0 },
    readers_only = { 0, 4 },
    mixed = { 3, 5 },
    one_each = { 1, 1 },
)]
#[test_macro(tokio::test)]
async fn every_participant_is_granted_exclusively(writers: usize, readers: usize) {
    let report = simulate(run(writers, readers)).await.unwrap();

    assert_eq!(report.timeline.len(), writers + readers);
    assert!(report.timed_out.is_empty());
    assert!(report.is_exclusive(), "violations: {:?}", report.violations);
}

#[tokio::test]
async fn writers_never_overlap_anyone() {
    let report = simulate(run(3, 4)).await.unwrap();

    for writer in report.timeline.iter().filter(|e| e.role == Role::Exclusive) {
        for other in report.timeline.iter().filter(|e| e.node != writer.node) {
            let overlaps = other.granted_at_ms < writer.released_at_ms
                && writer.granted_at_ms < other.released_at_ms;
            assert!(!overlaps, "{:?} overlaps {:?}", writer, other);
        }
    }
}

#[tokio::test]
async fn readers_alone_share_the_lock() {
    let report = simulate(SimulationConfig {
        hold: Duration::from_millis(50),
        ..run(0, 3)
    })
    .await
    .unwrap();

    assert!(report.max_concurrent_readers > 1);
}

#[tokio::test]
async fn mutex_mode_runs_writers_in_sequence_order() {
    let report = simulate(SimulationConfig {
        mode: LockMode::Mutex,
        ..run(4, 0)
    })
    .await
    .unwrap();

    let sequences: Vec<&str> = report.timeline.iter().map(|e| e.node.as_str()).collect();
    let mut sorted = sequences.clone();
    sorted.sort();
    assert_eq!(sequences, sorted);
}

#[tokio::test]
async fn readers_in_mutex_mode_are_rejected() {
    let err = simulate(SimulationConfig {
        mode: LockMode::Mutex,
        ..run(1, 1)
    })
    .await
    .unwrap_err();

    assert!(matches!(err, LockError::Config(_)));
}

#[tokio::test]
async fn short_timeouts_are_reported_not_fatal() {
    let report = simulate(SimulationConfig {
        hold: Duration::from_millis(100),
        timeout: Some(Duration::from_millis(20)),
        ..run(3, 0)
    })
    .await
    .unwrap();

    assert_eq!(report.timeline.len() + report.timed_out.len(), 3);
    assert!(!report.timed_out.is_empty());
    assert!(report.is_exclusive());
}

#[test]
fn cast_alternates_roles() {
    let names: Vec<String> = cast(2, 3).into_iter().map(|(name, _)| name).collect();

    assert_eq!(
        names,
        vec!["writer-1", "reader-1", "writer-2", "reader-2", "reader-3"]
    );
}
