// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

async fn with_dir(ns: &MemoryNamespace, path: &str) -> MemorySession {
    let session = ns.session();
    session
        .create_persistent_if_absent(path, Vec::new())
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn sequence_numbers_are_zero_padded_and_increase_per_parent() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks/a").await;
    session
        .create_persistent_if_absent("/locks/b", Vec::new())
        .await
        .unwrap();

    let first = session
        .create_sequential_ephemeral("/locks/a", "lock_", Vec::new())
        .await
        .unwrap();
    let second = session
        .create_sequential_ephemeral("/locks/a", "lock_", Vec::new())
        .await
        .unwrap();
    let other = session
        .create_sequential_ephemeral("/locks/b", "lock_", Vec::new())
        .await
        .unwrap();

    assert_eq!(first, "/locks/a/lock_0000000000");
    assert_eq!(second, "/locks/a/lock_0000000001");
    assert_eq!(other, "/locks/b/lock_0000000000");
}

#[tokio::test]
async fn sequence_is_shared_across_prefixes() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/rw").await;

    let write = session
        .create_sequential_ephemeral("/rw", "write_", Vec::new())
        .await
        .unwrap();
    let read = session
        .create_sequential_ephemeral("/rw", "read_", Vec::new())
        .await
        .unwrap();

    assert_eq!(write, "/rw/write_0000000000");
    assert_eq!(read, "/rw/read_0000000001");
}

#[tokio::test]
async fn sequence_is_not_reused_after_delete() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;

    let first = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();
    session.delete(&first, None).await.unwrap();
    let second = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();

    assert_eq!(second, "/locks/lock_0000000001");
}

#[tokio::test]
async fn create_persistent_creates_ancestors_and_is_idempotent() {
    let ns = MemoryNamespace::new();
    let session = ns.session();

    session
        .create_persistent_if_absent("/a/b/c", b"payload".to_vec())
        .await
        .unwrap();
    session
        .create_persistent_if_absent("/a/b/c", b"other".to_vec())
        .await
        .unwrap();

    assert!(ns.exists("/a"));
    assert!(ns.exists("/a/b"));
    assert_eq!(session.get_data("/a/b/c").await.unwrap(), b"payload");
}

#[tokio::test]
async fn sequential_create_requires_parent() {
    let ns = MemoryNamespace::new();
    let session = ns.session();

    let err = session
        .create_sequential_ephemeral("/missing", "lock_", Vec::new())
        .await
        .unwrap_err();

    assert_eq!(err, CoordinationError::NoNode("/missing".to_string()));
}

#[tokio::test]
async fn children_lists_names_not_paths() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();

    let children = session.get_children("/locks").await.unwrap();

    assert_eq!(children, vec!["lock_0000000000".to_string()]);
    assert!(session.get_children("/nope").await.is_err());
}

#[tokio::test]
async fn delete_fires_watch_once() {
    let ns = MemoryNamespace::new();
    let owner = with_dir(&ns, "/locks").await;
    let watcher = ns.session();
    let path = owner
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();

    let watch = watcher.exists_watch(&path).await.unwrap();
    assert!(watch.exists);
    assert_eq!(ns.watch_count(&path), 1);

    owner.delete(&path, None).await.unwrap();

    assert_eq!(
        watch.fired.await.unwrap(),
        WatchEvent::Deleted { path: path.clone() }
    );
    assert_eq!(ns.watch_count(&path), 0);
}

#[tokio::test]
async fn watch_on_missing_node_reports_absent() {
    let ns = MemoryNamespace::new();
    let session = ns.session();

    let watch = session.exists_watch("/locks/lock_0000000007").await.unwrap();

    assert!(!watch.exists);
}

#[tokio::test]
async fn abandoned_watches_on_missing_nodes_are_forgotten() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let gone = "/locks/lock_0000000007";

    let watch = session.exists_watch(gone).await.unwrap();
    assert_eq!(ns.watch_count(gone), 1);
    drop(watch);

    let own = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();
    session.delete(&own, None).await.unwrap();

    assert_eq!(ns.watch_count(gone), 0);
}

#[tokio::test]
async fn delete_rejects_version_mismatch_and_non_empty() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks/inner").await;

    assert_eq!(
        session.delete("/locks/inner", Some(3)).await,
        Err(CoordinationError::BadVersion("/locks/inner".to_string()))
    );
    assert_eq!(
        session.delete("/locks", None).await,
        Err(CoordinationError::NotEmpty("/locks".to_string()))
    );
    assert_eq!(
        session.delete("/locks/missing", None).await,
        Err(CoordinationError::NoNode("/locks/missing".to_string()))
    );
    session.delete("/locks/inner", Some(0)).await.unwrap();
}

#[tokio::test]
async fn expire_removes_ephemerals_and_notifies() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let observer = ns.session();
    let mut events = session.session_events();
    let path = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();
    let watch = observer.exists_watch(&path).await.unwrap();

    session.expire();

    assert!(!ns.exists(&path));
    assert!(ns.exists("/locks"));
    assert_eq!(watch.fired.await.unwrap(), WatchEvent::Deleted { path });
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired);
    assert_eq!(session.status(), SessionStatus::Expired);
    assert_eq!(
        session.get_children("/locks").await,
        Err(CoordinationError::SessionExpired)
    );
}

#[tokio::test]
async fn expire_resolves_own_watches_with_session_lost() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let other = ns.session();
    let path = other
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();
    let watch = session.exists_watch(&path).await.unwrap();

    session.expire();

    assert_eq!(watch.fired.await.unwrap(), WatchEvent::SessionLost);
    assert!(ns.exists(&path));
}

#[tokio::test]
async fn disconnect_keeps_nodes_but_fails_operations() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let path = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();

    session.disconnect();

    assert!(ns.exists(&path));
    assert_eq!(
        session.get_children("/locks").await,
        Err(CoordinationError::ConnectionLoss)
    );

    session.reconnect();
    assert_eq!(session.get_children("/locks").await.unwrap().len(), 1);
}

#[tokio::test]
async fn close_removes_ephemerals_and_is_idempotent() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let path = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();

    session.close().await.unwrap();
    session.close().await.unwrap();

    assert!(!ns.exists(&path));
    assert_eq!(session.status(), SessionStatus::Closed);
    assert_eq!(
        session.get_children("/locks").await,
        Err(CoordinationError::Closed)
    );
}

#[tokio::test]
async fn operator_remove_fires_watches() {
    let ns = MemoryNamespace::new();
    let session = with_dir(&ns, "/locks").await;
    let path = session
        .create_sequential_ephemeral("/locks", "lock_", Vec::new())
        .await
        .unwrap();
    let watch = session.exists_watch(&path).await.unwrap();

    ns.remove(&path).unwrap();

    assert_eq!(watch.fired.await.unwrap(), WatchEvent::Deleted { path });
}
