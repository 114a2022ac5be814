// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Handler descriptors, typed configuration, and the cancellation token
//! handed back by registration.
//!
//! There's no reflection here to identify a handler method by signature the
//! way a dynamic dispatcher would (first-parameter assignability, base-type
//! declaration, and so on) — the `MessageHandler<T>` trait (see
//! `dispatch-engine`) already pins a handler's signature to exactly one
//! message type at compile time, so the type checker enforces that instead
//! of a registry check. What remains worth carrying as data is the pair that
//! identifies *which* handler is registered for *which* message type, for
//! logging and registry bookkeeping.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::dispatch_data::MessageType;

/// Identifies one handler registration: the message type it's registered
/// against and the handler implementation's type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandlerActionDescriptor {
    pub message_type: MessageType,
    pub handler_type_name: &'static str,
}

impl MessageHandlerActionDescriptor {
    pub fn new(message_type: MessageType, handler_type_name: &'static str) -> Self {
        Self { message_type, handler_type_name }
    }
}

/// A configuration entry's type-erased key: the Rust type name of the
/// configuration value, one slot per distinct configuration type.
pub type ConfigKey = &'static str;
pub type ConfigValue = Arc<dyn Any + Send + Sync>;

/// Immutable `Map<ConfigType, ConfigObject>` built from class- and
/// method-level configuration, assembled in increasing precedence order so
/// later entries override earlier ones for the same key.
#[derive(Clone, Default)]
pub struct MessageHandlerConfiguration {
    values: BTreeMap<ConfigKey, ConfigValue>,
}

impl MessageHandlerConfiguration {
    pub fn builder() -> MessageHandlerConfigurationBuilder {
        MessageHandlerConfigurationBuilder::default()
    }

    /// Typed lookup; `None` if the feature was never configured.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values.get(std::any::type_name::<T>()).and_then(|v| v.downcast_ref::<T>())
    }

    /// True if a configuration value of type `T` was registered at all.
    pub fn is_enabled<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(std::any::type_name::<T>())
    }
}

/// Assembles a [`MessageHandlerConfiguration`] in assembly -> class -> method
/// precedence order; each `with` call for the same `T` overrides the
/// previous one.
#[derive(Default)]
pub struct MessageHandlerConfigurationBuilder {
    values: BTreeMap<ConfigKey, ConfigValue>,
}

impl MessageHandlerConfigurationBuilder {
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.values.insert(std::any::type_name::<T>(), Arc::new(value));
        self
    }

    pub fn build(self) -> MessageHandlerConfiguration {
        MessageHandlerConfiguration { values: self.values }
    }
}

static REGISTRATION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Token returned by `register`. `cancel()` is idempotent and atomically
/// removes the registration from the owning registry.
#[derive(Clone)]
pub struct HandlerRegistration {
    id: u64,
    descriptor: MessageHandlerActionDescriptor,
    cancel_fn: Arc<dyn Fn(u64) + Send + Sync>,
}

impl HandlerRegistration {
    /// Construct a registration token; `cancel_fn` is invoked with this
    /// registration's id exactly once, the first time `cancel()` is called.
    pub fn new(
        descriptor: MessageHandlerActionDescriptor,
        cancel_fn: Arc<dyn Fn(u64) + Send + Sync>,
    ) -> Self {
        Self { id: REGISTRATION_COUNTER.fetch_add(1, Ordering::Relaxed), descriptor, cancel_fn }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn descriptor(&self) -> MessageHandlerActionDescriptor {
        self.descriptor
    }

    /// Atomically remove this registration from its registry. Calling this
    /// more than once is safe; later calls are no-ops.
    pub fn cancel(&self) {
        (self.cancel_fn)(self.id);
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
