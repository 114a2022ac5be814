// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Typed handler registration and the type-erased storage the dispatcher
//! walks at dispatch time.
//!
//! [`MessageHandler<T>`] pins a handler to exactly one message type at
//! compile time, so there's no runtime signature check to perform at
//! registration; [`TypedHandler`] only has to convert the envelope's erased
//! payload back to `T`, which is a single `downcast` away.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use dispatch_core::dispatch_data::MessageType;
use dispatch_core::handler::{
    HandlerRegistration, MessageHandlerActionDescriptor, MessageHandlerConfiguration,
};
use dispatch_core::{DispatchData, DispatchResult};
use parking_lot::RwLock;

use crate::context::DispatchContext;

/// A handler for exactly one message type `T`.
#[async_trait]
pub trait MessageHandler<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn handle(
        &self,
        message: &T,
        data: &DispatchData,
        config: &MessageHandlerConfiguration,
        ctx: &DispatchContext,
    ) -> DispatchResult;
}

/// Type-erased handler, so the registry can hold handlers for any number of
/// distinct message types behind one collection.
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn invoke(
        &self,
        data: &DispatchData,
        config: &MessageHandlerConfiguration,
        ctx: &DispatchContext,
    ) -> DispatchResult;
}

struct TypedHandler<T, H> {
    handler: H,
    _marker: PhantomData<fn(T)>,
}

#[async_trait]
impl<T, H> ErasedHandler for TypedHandler<T, H>
where
    T: Send + Sync + 'static,
    H: MessageHandler<T>,
{
    async fn invoke(
        &self,
        data: &DispatchData,
        config: &MessageHandlerConfiguration,
        ctx: &DispatchContext,
    ) -> DispatchResult {
        match data.downcast::<T>() {
            Some(message) => self.handler.handle(message, data, config, ctx).await,
            None => DispatchResult::NotDispatched,
        }
    }
}

struct Entry {
    descriptor: MessageHandlerActionDescriptor,
    config: MessageHandlerConfiguration,
    handler: Arc<dyn ErasedHandler>,
}

/// Handlers keyed by [`MessageType`], in insertion order. Registration ids
/// are assigned by a monotonic counter ([`HandlerRegistration::new`]), so
/// the backing `BTreeMap`'s natural iteration order already is insertion
/// order — no separate ordering index needed.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: RwLock<BTreeMap<u64, Entry>>,
}

impl HandlerRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `handler` for message type `T`. Returns a token whose
    /// `cancel()` removes the registration; multiple registrations for the
    /// same `T` are allowed and all run on dispatch.
    pub fn register<T, H>(
        self: &Arc<Self>,
        handler: H,
        config: MessageHandlerConfiguration,
    ) -> HandlerRegistration
    where
        T: Send + Sync + 'static,
        H: MessageHandler<T> + 'static,
    {
        let descriptor =
            MessageHandlerActionDescriptor::new(MessageType::of::<T>(), std::any::type_name::<H>());
        let erased: Arc<dyn ErasedHandler> =
            Arc::new(TypedHandler::<T, H> { handler, _marker: PhantomData });

        let registry = Arc::clone(self);
        let registration =
            HandlerRegistration::new(descriptor, Arc::new(move |id: u64| {
                registry.entries.write().remove(&id);
            }));

        self.entries.write().insert(registration.id(), Entry { descriptor, config, handler: erased });
        registration
    }

    /// Registered handlers for `message_type`, in registration order.
    pub(crate) fn handlers_for(
        &self,
        message_type: MessageType,
    ) -> Vec<(MessageHandlerConfiguration, Arc<dyn ErasedHandler>)> {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.descriptor.message_type == message_type)
            .map(|entry| (entry.config.clone(), Arc::clone(&entry.handler)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "handler_registry_tests.rs"]
mod tests;
