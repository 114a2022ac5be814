// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use async_trait::async_trait;
use dispatch_adapters::FakeTransport;
use dispatch_core::handler::MessageHandlerConfiguration;
use dispatch_core::session::CoordinationSession;
use dispatch_engine::context::DispatchContext;
use dispatch_engine::{HandlerRegistry, MessageHandler, ProcessorPipeline};
use dispatch_store::{InMemoryEntityStorage, InMemorySessionStorage};
use dispatch_wire::WireDispatchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Ping {
    nonce: u32,
}

struct Echo;

#[async_trait]
impl MessageHandler<Ping> for Echo {
    async fn handle(
        &self,
        message: &Ping,
        _data: &DispatchData,
        _config: &MessageHandlerConfiguration,
        _ctx: &DispatchContext,
    ) -> DispatchResult {
        DispatchResult::typed(message.nonce)
    }
}

fn local_dispatcher() -> Arc<LocalDispatcher> {
    let registry = HandlerRegistry::new();
    registry.register::<Ping, _>(Echo, MessageHandlerConfiguration::default());
    Arc::new(LocalDispatcher::new(registry, Arc::new(ProcessorPipeline::empty())))
}

fn router(transport: FakeTransport) -> (Arc<EndPointRouter>, Arc<dyn dispatch_store::SessionStorage>) {
    let sessions: Arc<dyn dispatch_store::SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let router = Arc::new(EndPointRouter::new(
        sessions.clone(),
        Arc::new(InMemoryEntityStorage::new()),
        Arc::new(transport),
    ));
    (router, sessions)
}

#[tokio::test]
async fn bypasses_transport_when_the_target_is_this_process() {
    let (router, sessions) = router(FakeTransport::new());
    let session = CoordinationSession::generate(1, "127.0.0.1:9000");
    sessions.try_begin(session.clone(), u64::MAX).await.unwrap();
    router.register("billing", "127.0.0.1:9000", &session).await.unwrap();

    let dispatcher =
        RemoteDispatcher::new(local_dispatcher(), router, "127.0.0.1:9000".to_string());

    let data = DispatchData::from_message(Ping { nonce: 7 });
    let result = dispatcher.dispatch::<Ping>(data, Some("billing"), false).await;
    assert_eq!(result.as_typed::<u32>(), Some(&7));
}

#[tokio::test]
async fn sends_over_the_wire_when_the_target_is_remote() {
    let transport = FakeTransport::new();
    transport.on("10.0.0.9:9000", |request| {
        let ping: Ping = request.decode()?;
        Ok(WireDispatchResult::Typed {
            type_name: "u32".to_string(),
            value: serde_json::json!(ping.nonce),
        })
    });
    let (router, sessions) = router(transport);
    let session = CoordinationSession::generate(1, "10.0.0.9:9000");
    sessions.try_begin(session.clone(), u64::MAX).await.unwrap();
    router.register("billing", "10.0.0.9:9000", &session).await.unwrap();

    let dispatcher =
        RemoteDispatcher::new(local_dispatcher(), router, "127.0.0.1:1".to_string());

    let data = DispatchData::from_message(Ping { nonce: 9 });
    let result = dispatcher.dispatch::<Ping>(data, Some("billing"), false).await;
    match result {
        DispatchResult::Typed { value, .. } => {
            assert_eq!(value.downcast_ref::<serde_json::Value>(), Some(&serde_json::json!(9)));
        }
        other => panic!("expected a typed result, got {other:?}"),
    }
}

#[tokio::test]
async fn falls_back_to_local_dispatch_with_no_route_registered_anywhere() {
    let (router, _sessions) = router(FakeTransport::new());
    let dispatcher =
        RemoteDispatcher::new(local_dispatcher(), router, "127.0.0.1:9000".to_string());

    let data = DispatchData::from_message(Ping { nonce: 3 });
    let result = dispatcher.dispatch::<Ping>(data, None, false).await;
    assert_eq!(result.as_typed::<u32>(), Some(&3));
}

#[tokio::test]
async fn uses_the_registered_default_route_when_no_end_point_is_named() {
    let (router, sessions) = router(FakeTransport::new());
    let session = CoordinationSession::generate(1, "127.0.0.1:9000");
    sessions.try_begin(session.clone(), u64::MAX).await.unwrap();
    router.register("billing", "127.0.0.1:9000", &session).await.unwrap();
    router
        .register_type_default(
            dispatch_core::DispatchData::from_message(Ping { nonce: 0 }).message_type().name(),
            "billing",
        )
        .await
        .unwrap();

    let dispatcher =
        RemoteDispatcher::new(local_dispatcher(), router, "127.0.0.1:9000".to_string());

    let data = DispatchData::from_message(Ping { nonce: 11 });
    let result = dispatcher.dispatch::<Ping>(data, None, false).await;
    assert_eq!(result.as_typed::<u32>(), Some(&11));
}
