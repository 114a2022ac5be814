// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use dispatch_core::session::CoordinationSession;
use dispatch_core::FakeClock;
use dispatch_store::InMemorySessionStorage;

#[tokio::test]
async fn ends_a_session_whose_lease_has_passed() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let clock = FakeClock::new();
    let session = CoordinationSession::generate(clock.epoch_ms(), "10.0.0.1:9000");
    sessions.try_begin(session.clone(), clock.epoch_ms() + 1_000).await.unwrap();

    clock.advance(Duration::from_millis(2_000));
    reap_once(&sessions, &clock).await.unwrap();

    let record = sessions.get_sessions().await.unwrap().into_iter().find(|r| r.session == session).unwrap();
    assert!(record.is_ended);
}

#[tokio::test]
async fn leaves_a_session_with_time_remaining_alone() {
    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let clock = FakeClock::new();
    let session = CoordinationSession::generate(clock.epoch_ms(), "10.0.0.1:9000");
    sessions.try_begin(session.clone(), clock.epoch_ms() + 10_000).await.unwrap();

    reap_once(&sessions, &clock).await.unwrap();

    let record = sessions.get_sessions().await.unwrap().into_iter().find(|r| r.session == session).unwrap();
    assert!(!record.is_ended);
}

/// S3. Stop renewing a session; once its lease has passed, the router's
/// cleanup wakes and the route it owned is no longer resolvable.
#[tokio::test]
async fn expired_lease_wakes_route_cleanup() {
    use dispatch_adapters::FakeTransport;
    use dispatch_store::InMemoryEntityStorage;

    let sessions: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn dispatch_store::EntityStorage> = Arc::new(InMemoryEntityStorage::new());
    let router =
        Arc::new(crate::router::EndPointRouter::new(sessions.clone(), entities, Arc::new(FakeTransport::new())));
    let clock = FakeClock::new();

    let session = CoordinationSession::generate(clock.epoch_ms(), "10.0.0.1:9000");
    sessions.try_begin(session.clone(), clock.epoch_ms() + 1_000).await.unwrap();
    router.register("billing", "10.0.0.1:9000", &session).await.unwrap();

    let cleanup = tokio::spawn(router.clone().run_cleanup());

    clock.advance(Duration::from_millis(2_000));
    reap_once(&sessions, &clock).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    cleanup.abort();

    assert!(router.resolve("billing").await.unwrap().is_empty());
}
