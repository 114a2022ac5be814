// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! The processor chain a dispatch runs through before reaching its
//! handler(s).
//!
//! A processor's `next` continuation is consumed by value: the type system
//! already rules out the "called `next` twice" programming error the
//! ordering invariant warns against, since there's no way to get a second
//! owned copy of it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dispatch_core::dispatch_data::MessageType;
use dispatch_core::processor::{topological_order, MessageProcessorRegistration, ProcessorName};
use dispatch_core::{DispatchData, DispatchResult};
use futures::future::BoxFuture;

use crate::context::DispatchContext;
use crate::error::EngineError;

#[async_trait]
pub trait Processor: Send + Sync {
    /// Handle `data`, then either return a result directly (short-circuit)
    /// or call `next.call(data, ctx)` to continue the chain.
    async fn process(&self, data: DispatchData, ctx: DispatchContext, next: Next) -> DispatchResult;
}

type HandlerFn = Arc<dyn Fn(DispatchData, DispatchContext) -> BoxFuture<'static, DispatchResult> + Send + Sync>;

/// The remainder of the processor chain, culminating in the dispatcher's
/// handler invocation.
pub struct Next {
    remaining: Arc<[Arc<dyn Processor>]>,
    index: usize,
    handler: HandlerFn,
}

impl Next {
    pub fn call(self, data: DispatchData, ctx: DispatchContext) -> BoxFuture<'static, DispatchResult> {
        Box::pin(async move {
            match self.remaining.get(self.index) {
                Some(processor) => {
                    let processor = Arc::clone(processor);
                    let next =
                        Next { remaining: Arc::clone(&self.remaining), index: self.index + 1, handler: Arc::clone(&self.handler) };
                    processor.process(data, ctx, next).await
                }
                None => (self.handler)(data, ctx).await,
            }
        })
    }
}

/// A set of processor registrations, each paired with its implementation,
/// ordered once at construction time.
pub struct ProcessorPipeline {
    entries: Vec<(MessageProcessorRegistration, Arc<dyn Processor>)>,
    order: Vec<ProcessorName>,
}

impl ProcessorPipeline {
    /// Build a pipeline from `entries`, computing the topological order up
    /// front. Fails if the dependency predicates describe a cycle.
    pub fn build(
        entries: Vec<(MessageProcessorRegistration, Arc<dyn Processor>)>,
    ) -> Result<Self, EngineError> {
        let registrations: Vec<_> = entries.iter().map(|(registration, _)| registration.clone()).collect();
        let order = topological_order(&registrations)
            .map_err(|processor| EngineError::ProcessorCycle { processor })?;
        Ok(Self { entries, order })
    }

    pub fn empty() -> Self {
        Self { entries: Vec::new(), order: Vec::new() }
    }

    fn applicable_chain(&self, message_type: MessageType) -> Vec<Arc<dyn Processor>> {
        let by_name: BTreeMap<&ProcessorName, &(MessageProcessorRegistration, Arc<dyn Processor>)> =
            self.entries.iter().map(|entry| (&entry.0.name, entry)).collect();

        self.order
            .iter()
            .filter_map(|name| by_name.get(name).copied())
            .filter(|(registration, _)| registration.applicability.applies_to(message_type))
            .map(|(_, processor)| Arc::clone(processor))
            .collect()
    }

    /// Run the chain of processors applicable to `data`'s message type,
    /// then `handler` if none short-circuited.
    pub async fn run(
        &self,
        data: DispatchData,
        ctx: DispatchContext,
        handler: impl Fn(DispatchData, DispatchContext) -> BoxFuture<'static, DispatchResult> + Send + Sync + 'static,
    ) -> DispatchResult {
        let chain = self.applicable_chain(data.message_type());
        let next = Next { remaining: Arc::from(chain), index: 0, handler: Arc::new(handler) };
        next.call(data, ctx).await
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
