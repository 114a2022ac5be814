// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! The local dispatcher: resolves registered handlers for a message and
//! runs each one through the processor pipeline, producing a
//! [`DispatchResult`].
//!
//! Rust message types have no base-type hierarchy the way a reflection-based
//! dispatcher's messages might, so "most-derived-first" resolution
//! collapses to "handlers registered for this exact `MessageType`, in
//! registration order" — there's only ever one level to resolve.

use std::sync::Arc;

use dispatch_core::{DispatchData, DispatchResult};

use crate::context::DispatchContext;
use crate::handler_registry::{ErasedHandler, HandlerRegistry};
use crate::pipeline::ProcessorPipeline;

pub struct LocalDispatcher {
    registry: Arc<HandlerRegistry>,
    pipeline: Arc<ProcessorPipeline>,
}

impl LocalDispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, pipeline: Arc<ProcessorPipeline>) -> Self {
        Self { registry, pipeline }
    }

    /// Dispatch `data`. `publish = true` invokes every matching handler
    /// concurrently and aggregates their results (success iff all
    /// succeed); `publish = false` invokes matching handlers in
    /// registration order until one returns something other than
    /// `NotDispatched`.
    pub async fn dispatch(&self, data: DispatchData, publish: bool) -> DispatchResult {
        let ctx = DispatchContext::new();
        let message_type = data.message_type().name();
        let op = if publish { "publish" } else { "send" };
        tracing::info!(dispatch_id = ctx.dispatch_id(), message_type, op, "dispatching");

        let start = std::time::Instant::now();
        let result =
            if publish { self.dispatch_publish(data, ctx).await } else { self.dispatch_single(data, ctx).await };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if result.is_success() {
            tracing::info!(
                dispatch_id = ctx.dispatch_id(),
                elapsed_ms,
                result = result.wire_tag(),
                "dispatch completed"
            );
        } else {
            tracing::warn!(
                dispatch_id = ctx.dispatch_id(),
                elapsed_ms,
                result = result.wire_tag(),
                "dispatch completed"
            );
        }
        result
    }

    async fn dispatch_publish(&self, data: DispatchData, ctx: DispatchContext) -> DispatchResult {
        let entries = self.registry.handlers_for(data.message_type());
        if entries.is_empty() {
            return DispatchResult::NotDispatched;
        }

        let mut tasks = Vec::with_capacity(entries.len());
        for (config, handler) in entries {
            let pipeline = Arc::clone(&self.pipeline);
            let data = data.clone_payload();
            tasks.push(tokio::spawn(async move {
                pipeline
                    .run(data, ctx, move |data, ctx| {
                        let handler = Arc::clone(&handler);
                        let config = config.clone();
                        Box::pin(async move { handler.invoke(&data, &config, &ctx).await })
                    })
                    .await
            }));
        }

        let mut children = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(result) => children.push(result),
                Err(source) => children.push(DispatchResult::failure(format!("handler task panicked: {source}"))),
            }
        }
        DispatchResult::aggregate(children)
    }

    async fn dispatch_single(&self, data: DispatchData, ctx: DispatchContext) -> DispatchResult {
        let entries = self.registry.handlers_for(data.message_type());
        for (config, handler) in entries {
            let envelope = data.clone_payload();
            let result = self
                .pipeline
                .run(envelope, ctx, move |data, ctx| {
                    let handler = Arc::clone(&handler);
                    let config = config.clone();
                    Box::pin(async move { handler.invoke(&data, &config, &ctx).await })
                })
                .await;
            if !matches!(result, DispatchResult::NotDispatched) {
                return result;
            }
        }
        DispatchResult::NotDispatched
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
