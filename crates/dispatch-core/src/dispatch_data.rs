// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! The immutable message envelope.
//!
//! Rust has no open generics, delegates, or value-type/reference-type split
//! at the type-system level, so there's no way to forbid a value-type or
//! open-generic message at registration time the way a reflection-based
//! dispatcher would — every `T: 'static + Send + Sync` is dispatchable here.
//! What does carry over is routing on a runtime handle rather than a static
//! generic parameter: the message type travels as a value (`MessageType`) so
//! the dispatcher can route on it without knowing `T` at the call site.

use serde_json::Value as JsonValue;
use smol_str::SmolStr;
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A runtime handle for a message's Rust type: a [`TypeId`] for equality and
/// routing, plus its type name for logging and the wire envelope's
/// `message-type` tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageType {
    type_id: TypeId,
    name: &'static str,
}

impl MessageType {
    pub fn of<T: Any>() -> Self {
        Self { type_id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageType({})", self.name)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Immutable insertion-order-irrelevant side-data map. Missing keys return
/// `None` rather than panicking — lookups never throw.
pub type DispatchDataMap = BTreeMap<SmolStr, JsonValue>;

/// The immutable envelope passed through the processor pipeline and into a
/// handler.
#[derive(Clone)]
pub struct DispatchData {
    message_type: MessageType,
    message: Arc<dyn Any + Send + Sync>,
    data: Arc<DispatchDataMap>,
}

impl DispatchData {
    /// Construct an envelope. `message` is stored behind an `Arc` so cloning
    /// the envelope (e.g. for a broadcast publish) never clones the payload.
    pub fn new<T: Any + Send + Sync>(message: T, data: DispatchDataMap) -> Self {
        Self { message_type: MessageType::of::<T>(), message: Arc::new(message), data: Arc::new(data) }
    }

    /// Construct an envelope with no side data.
    pub fn from_message<T: Any + Send + Sync>(message: T) -> Self {
        Self::new(message, DispatchDataMap::new())
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Look up a side-data key. Never panics on a missing key.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    /// Enumerate the backing side-data entries.
    pub fn data(&self) -> &DispatchDataMap {
        &self.data
    }

    /// Recover the typed message, or `None` if `T` doesn't match the
    /// envelope's actual [`MessageType`].
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.message.downcast_ref::<T>()
    }

    /// Re-wrap the same message and data behind a new envelope. Used by the
    /// round-trip invariant: constructing a fresh envelope
    /// from an existing one's payload must observe identical `get` results.
    pub fn clone_payload(&self) -> Self {
        Self { message_type: self.message_type, message: self.message.clone(), data: self.data.clone() }
    }
}

impl fmt::Debug for DispatchData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchData")
            .field("message_type", &self.message_type)
            .field("data_keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[path = "dispatch_data_tests.rs"]
mod tests;
