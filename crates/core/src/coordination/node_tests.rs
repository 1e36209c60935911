// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn parses_zero_padded_sequence() {
    let name = NodeName::parse("write_0000000042").unwrap();
    assert_eq!(name.sequence(), 42);
    assert_eq!(name.prefix(), "write_");
    assert_eq!(name.as_str(), "write_0000000042");
}

#[test]
fn parses_bare_sequence() {
    let name = NodeName::parse("003").unwrap();
    assert_eq!(name.sequence(), 3);
    assert_eq!(name.prefix(), "");
}

#[test]
fn rejects_name_without_sequence() {
    assert_eq!(
        NodeName::parse("config"),
        Err(NodeError::MissingSequence("config".to_string()))
    );
}

#[test]
fn orders_by_sequence_across_prefixes() {
    let mut names: Vec<NodeName> = ["write_0000000003", "read_0000000001", "write_0000000002"]
        .iter()
        .map(|n| NodeName::parse(n).unwrap())
        .collect();
    names.sort();

    let raw: Vec<&str> = names.iter().map(NodeName::as_str).collect();
    assert_eq!(
        raw,
        vec!["read_0000000001", "write_0000000002", "write_0000000003"]
    );
}

#[parameterized(
    reader = { "read_0000000001", Role::Shared },
    writer = { "write_0000000001", Role::Exclusive },
    mutex = { "lock_0000000001", Role::Exclusive },
    foreign = { "other_0000000001", Role::Exclusive },
)]
fn role_from_prefix(raw: &str, expected: Role) {
    assert_eq!(NodeName::parse(raw).unwrap().role(), expected);
}

#[parameterized(
    mutex_exclusive = { LockMode::Mutex, Role::Exclusive, Ok(LOCK_PREFIX) },
    mutex_shared = { LockMode::Mutex, Role::Shared, Err(NodeError::SharedRoleInMutexMode) },
    rw_exclusive = { LockMode::ReadWrite, Role::Exclusive, Ok(WRITE_PREFIX) },
    rw_shared = { LockMode::ReadWrite, Role::Shared, Ok(READ_PREFIX) },
)]
fn prefix_table(mode: LockMode, role: Role, expected: Result<&'static str, NodeError>) {
    assert_eq!(mode.prefix_for(role), expected);
}

#[test]
fn role_and_mode_parse_from_strings() {
    assert_eq!("read".parse::<Role>().unwrap(), Role::Shared);
    assert_eq!("exclusive".parse::<Role>().unwrap(), Role::Exclusive);
    assert_eq!("read-write".parse::<LockMode>().unwrap(), LockMode::ReadWrite);
    assert!("bogus".parse::<Role>().is_err());
    assert!("bogus".parse::<LockMode>().is_err());
}

#[parameterized(
    relative = { "locks" },
    trailing = { "/locks/" },
    empty_segment = { "/locks//a" },
)]
fn invalid_lock_paths(raw: &str) {
    assert!(LockPath::new(raw).is_err());
}

#[test]
fn lock_path_join_and_child_name() {
    let dir = LockPath::new("/app/locks").unwrap();
    let full = dir.join("lock_0000000001");
    assert_eq!(full, "/app/locks/lock_0000000001");
    assert_eq!(dir.child_name(&full).unwrap(), "lock_0000000001");
    assert!(dir.child_name("/app/other/lock_0000000001").is_err());
    assert!(dir.child_name("/app/locks/a/b").is_err());
}

#[test]
fn root_lock_path_joins_without_double_slash() {
    let root = LockPath::new("/").unwrap();
    assert_eq!(root.join("lock_0000000001"), "/lock_0000000001");
    assert_eq!(root.child_name("/lock_0000000001").unwrap(), "lock_0000000001");
    assert!(root.ancestry().is_empty());
}

#[test]
fn ancestry_lists_each_level() {
    let dir = LockPath::new("/a/b/c").unwrap();
    assert_eq!(dir.ancestry(), vec!["/a", "/a/b", "/a/b/c"]);
}

#[test]
fn lock_path_deserializes_with_validation() {
    let ok: LockPath = serde_json::from_str("\"/locks\"").unwrap();
    assert_eq!(ok.as_str(), "/locks");
    assert!(serde_json::from_str::<LockPath>("\"locks\"").is_err());
}
