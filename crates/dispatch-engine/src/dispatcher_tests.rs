// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use crate::handler_registry::MessageHandler;
use crate::pipeline::Processor;
use dispatch_core::handler::MessageHandlerConfiguration;
use dispatch_core::processor::MessageProcessorRegistration;

struct Ping;

struct PongHandler;

#[async_trait::async_trait]
impl MessageHandler<Ping> for PongHandler {
    async fn handle(
        &self,
        _message: &Ping,
        _data: &DispatchData,
        _config: &MessageHandlerConfiguration,
        _ctx: &DispatchContext,
    ) -> DispatchResult {
        DispatchResult::typed("pong".to_string())
    }
}

struct FailingHandler;

#[async_trait::async_trait]
impl MessageHandler<Ping> for FailingHandler {
    async fn handle(
        &self,
        _message: &Ping,
        _data: &DispatchData,
        _config: &MessageHandlerConfiguration,
        _ctx: &DispatchContext,
    ) -> DispatchResult {
        DispatchResult::failure("boom")
    }
}

struct AuthGate;

#[async_trait::async_trait]
impl Processor for AuthGate {
    async fn process(
        &self,
        _data: DispatchData,
        _ctx: DispatchContext,
        _next: crate::pipeline::Next,
    ) -> DispatchResult {
        DispatchResult::NotAuthorized
    }
}

fn dispatcher_with(
    entries: Vec<(MessageProcessorRegistration, Arc<dyn Processor>)>,
) -> LocalDispatcher {
    let registry = HandlerRegistry::new();
    registry.register::<Ping, _>(PongHandler, MessageHandlerConfiguration::default());
    let pipeline = Arc::new(ProcessorPipeline::build(entries).unwrap());
    LocalDispatcher::new(registry, pipeline)
}

#[tokio::test]
async fn single_dispatch_returns_the_handlers_typed_result() {
    let dispatcher = dispatcher_with(Vec::new());
    let result = dispatcher.dispatch(DispatchData::from_message(Ping), false).await;

    assert!(result.is_success());
    assert_eq!(result.as_typed::<String>(), Some(&"pong".to_string()));
}

#[tokio::test]
async fn publish_aggregates_results_and_fails_if_any_handler_fails() {
    let registry = HandlerRegistry::new();
    registry.register::<Ping, _>(PongHandler, MessageHandlerConfiguration::default());
    registry.register::<Ping, _>(FailingHandler, MessageHandlerConfiguration::default());
    let pipeline = Arc::new(ProcessorPipeline::empty());
    let dispatcher = LocalDispatcher::new(registry, pipeline);

    let result = dispatcher.dispatch(DispatchData::from_message(Ping), true).await;

    assert!(!result.is_success());
    match result {
        DispatchResult::Aggregate { children } => assert_eq!(children.len(), 2),
        other => panic!("expected an aggregate result, got {other:?}"),
    }
}

#[tokio::test]
async fn send_with_no_registered_handler_is_not_dispatched() {
    let registry = HandlerRegistry::new();
    let pipeline = Arc::new(ProcessorPipeline::empty());
    let dispatcher = LocalDispatcher::new(registry, pipeline);

    let result = dispatcher.dispatch(DispatchData::from_message(Ping), false).await;

    assert!(matches!(result, DispatchResult::NotDispatched));
}

#[tokio::test]
async fn processor_short_circuit_prevents_the_handler_from_running() {
    let entries: Vec<(MessageProcessorRegistration, Arc<dyn Processor>)> =
        vec![(MessageProcessorRegistration::new("auth"), Arc::new(AuthGate))];
    let dispatcher = dispatcher_with(entries);

    let result = dispatcher.dispatch(DispatchData::from_message(Ping), false).await;

    assert!(matches!(result, DispatchResult::NotAuthorized));
}
