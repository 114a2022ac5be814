// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use dispatch_core::test_support::test_entry_path;
use std::time::Duration;

#[tokio::test]
async fn try_begin_twice_for_the_same_session_conflicts() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    store.try_begin(session.clone(), 1_000).await.unwrap();

    let err = store.try_begin(session, 1_000).await.unwrap_err();
    assert!(matches!(err, StoreError::ConcurrencyConflict { .. }));
}

#[tokio::test]
async fn update_lease_rejects_stale_version() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    store.try_begin(session.clone(), 1_000).await.unwrap();

    let err = store.update_lease(&session, 41, 2_000).await.unwrap_err();
    assert!(matches!(err, StoreError::ConcurrencyConflict { expected: 41, actual: 0 }));
}

#[tokio::test]
async fn update_lease_extends_and_bumps_version() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    let begun = store.try_begin(session.clone(), 1_000).await.unwrap();

    let renewed = store.update_lease(&session, begun.storage_version, 5_000).await.unwrap();
    assert_eq!(renewed.lease_end_ms, 5_000);
    assert_eq!(renewed.storage_version, 1);
    assert!(store.is_alive(&session, 4_999).await.unwrap());
    assert!(!store.is_alive(&session, 5_000).await.unwrap());
}

#[tokio::test]
async fn entries_can_be_added_and_removed_under_cas() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    let begun = store.try_begin(session.clone(), 1_000).await.unwrap();
    let path = test_entry_path(&["routes", "payments"]);

    let added = store.add_entry(&session, begun.storage_version, path.clone()).await.unwrap();
    assert_eq!(store.get_entries(&session).await.unwrap(), vec![path.clone()]);

    store.remove_entry(&session, added.storage_version, &path).await.unwrap();
    assert!(store.get_entries(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn ending_an_unknown_session_is_not_found() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    let err = store.end(&session, 0).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn wait_for_termination_resolves_immediately_for_unknown_session() {
    let store = InMemorySessionStorage::new();
    let session = CoordinationSession::generate(0, "node-a");
    tokio::time::timeout(Duration::from_millis(100), store.wait_for_termination(&session))
        .await
        .expect("should resolve without waiting on a never-begun session");
}

#[tokio::test]
async fn wait_for_termination_wakes_up_when_the_session_ends() {
    let store = std::sync::Arc::new(InMemorySessionStorage::new());
    let session = CoordinationSession::generate(0, "node-a");
    let begun = store.try_begin(session.clone(), 1_000).await.unwrap();

    let waiter_store = store.clone();
    let waiter_session = session.clone();
    let waiter = tokio::spawn(async move {
        tokio::time::timeout(Duration::from_secs(2), waiter_store.wait_for_termination(&waiter_session))
            .await
            .expect("termination should be observed")
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    store.end(&session, begun.storage_version).await.unwrap();

    waiter.await.unwrap();
}

#[tokio::test]
async fn get_sessions_lists_every_live_record() {
    let store = InMemorySessionStorage::new();
    let a = CoordinationSession::generate(0, "node-a");
    let b = CoordinationSession::generate(1, "node-b");
    store.try_begin(a, 1_000).await.unwrap();
    store.try_begin(b, 1_000).await.unwrap();

    assert_eq!(store.get_sessions().await.unwrap().len(), 2);
}
