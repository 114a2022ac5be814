// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use dispatch_adapters::FakeTransport;
use dispatch_store::{InMemoryEntityStorage, InMemorySessionStorage};
use std::collections::BTreeMap;

fn router(transport: FakeTransport) -> EndPointRouter {
    EndPointRouter::new(
        Arc::new(InMemorySessionStorage::new()),
        Arc::new(InMemoryEntityStorage::new()),
        Arc::new(transport),
    )
}

async fn live_session(
    sessions: &Arc<dyn SessionStorage>,
    physical_address: &str,
) -> CoordinationSession {
    let session = CoordinationSession::generate(1, physical_address);
    sessions.try_begin(session.clone(), u64::MAX).await.unwrap();
    session
}

fn ping() -> WireEnvelope {
    WireEnvelope::encode(&"ping".to_string(), BTreeMap::new(), false).unwrap()
}

#[tokio::test]
async fn register_then_resolve_returns_the_physical_address() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let router = EndPointRouter::new(sessions.clone(), entities, Arc::new(FakeTransport::new()));

    let session = live_session(&sessions, "10.0.0.1:9000").await;
    router.register("billing", "10.0.0.1:9000", &session).await.unwrap();

    let addresses = router.resolve("billing").await.unwrap();
    assert_eq!(addresses, vec!["10.0.0.1:9000"]);
}

#[tokio::test]
async fn resolve_is_empty_for_an_unknown_end_point() {
    let router = router(FakeTransport::new());
    let addresses = router.resolve("nothing-here").await.unwrap();
    assert!(addresses.is_empty());
}

#[tokio::test]
async fn unregister_removes_the_route() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let router = EndPointRouter::new(sessions.clone(), entities, Arc::new(FakeTransport::new()));

    let session = live_session(&sessions, "10.0.0.1:9000").await;
    router.register("billing", "10.0.0.1:9000", &session).await.unwrap();
    router.unregister("billing", &session).await.unwrap();

    assert!(router.resolve("billing").await.unwrap().is_empty());
}

#[tokio::test]
async fn send_delivers_to_the_only_live_address() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let transport = FakeTransport::new();
    transport.on("10.0.0.1:9000", |_| Ok(WireDispatchResult::Success));
    let router = EndPointRouter::new(sessions.clone(), entities, Arc::new(transport));

    let session = live_session(&sessions, "10.0.0.1:9000").await;
    router.register("billing", "10.0.0.1:9000", &session).await.unwrap();

    let result = router.send("billing", &ping()).await.unwrap();
    assert!(matches!(result, WireDispatchResult::Success));
}

#[tokio::test]
async fn send_retries_the_next_address_on_transport_failure() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let transport = FakeTransport::new();
    transport.on("10.0.0.1:9000", |_| {
        Err(AdaptersError::Io(std::io::Error::other("down")))
    });
    transport.on("10.0.0.1:9001", |_| Ok(WireDispatchResult::Success));
    let router = EndPointRouter::new(sessions.clone(), entities, Arc::new(transport));

    let a = live_session(&sessions, "10.0.0.1:9000").await;
    let b = live_session(&sessions, "10.0.0.1:9001").await;
    router.register("billing", "10.0.0.1:9000", &a).await.unwrap();
    router.register("billing", "10.0.0.1:9001", &b).await.unwrap();

    let result = router.send("billing", &ping()).await.unwrap();
    assert!(matches!(result, WireDispatchResult::Success));
}

#[tokio::test]
async fn send_fails_when_no_route_is_registered() {
    let router = router(FakeTransport::new());
    let error = router.send("billing", &ping()).await.unwrap_err();
    assert!(matches!(error, RouterError::NoRoute { .. }));
}

#[tokio::test]
async fn broadcast_aggregates_results_from_every_live_address() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let transport = FakeTransport::new();
    transport.on("10.0.0.1:9000", |_| Ok(WireDispatchResult::Success));
    transport.on("10.0.0.1:9001", |_| {
        Err(AdaptersError::Io(std::io::Error::other("down")))
    });
    let router = EndPointRouter::new(sessions.clone(), entities, Arc::new(transport));

    let a = live_session(&sessions, "10.0.0.1:9000").await;
    let b = live_session(&sessions, "10.0.0.1:9001").await;
    router.register("billing", "10.0.0.1:9000", &a).await.unwrap();
    router.register("billing", "10.0.0.1:9001", &b).await.unwrap();

    let result = router.broadcast("billing", &ping()).await.unwrap();
    match result {
        WireDispatchResult::Aggregate { children } => {
            assert_eq!(children.len(), 2);
            assert!(children.iter().any(|c| matches!(c, WireDispatchResult::Success)));
            assert!(children.iter().any(|c| matches!(c, WireDispatchResult::Failure { .. })));
        }
        other => panic!("expected an aggregate result, got {other:?}"),
    }
}

#[tokio::test]
async fn resolve_type_default_finds_the_registered_end_point() {
    let router = router(FakeTransport::new());
    router.register_type_default("billing::Invoice", "billing").await.unwrap();

    let end_point = router.resolve_type_default("billing::Invoice").await.unwrap();
    assert_eq!(end_point.as_deref(), Some("billing"));
}

#[tokio::test]
async fn resolve_type_default_is_none_for_an_unregistered_type() {
    let router = router(FakeTransport::new());
    assert_eq!(router.resolve_type_default("billing::Invoice").await.unwrap(), None);
}

#[tokio::test]
async fn cleanup_drains_routes_for_ended_sessions() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let router =
        Arc::new(EndPointRouter::new(sessions.clone(), entities, Arc::new(FakeTransport::new())));

    let session = live_session(&sessions, "10.0.0.1:9000").await;
    router.register("billing", "10.0.0.1:9000", &session).await.unwrap();

    let cleanup = tokio::spawn(router.clone().run_cleanup());

    let current = sessions
        .get_sessions()
        .await
        .unwrap()
        .into_iter()
        .find(|record| record.session == session)
        .unwrap();
    sessions.end(&session, current.storage_version).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    cleanup.abort();

    assert!(router.resolve("billing").await.unwrap().is_empty());
}
