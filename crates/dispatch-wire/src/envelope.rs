// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! JSON wire representation of a dispatch envelope: the message type tag,
//! the serialized message body, and side-data. Paired with `frame` for
//! length-prefixed transport.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use smol_str::SmolStr;

use crate::error::WireError;

/// On-the-wire shape of a [`dispatch_core::DispatchData`] envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireEnvelope {
    #[serde(rename = "message-type")]
    pub message_type: String,
    pub message: JsonValue,
    #[serde(default)]
    pub data: BTreeMap<SmolStr, JsonValue>,
    /// Whether the originating dispatch was a publish (fan out to every
    /// matching handler) rather than a single-handler send. Carried over
    /// the wire so the receiving node's local dispatch uses the same
    /// semantics as the call site.
    #[serde(default)]
    pub publish: bool,
}

impl WireEnvelope {
    /// Serialize `message` and tag it with its Rust type name.
    pub fn encode<T: Serialize>(
        message: &T,
        data: BTreeMap<SmolStr, JsonValue>,
        publish: bool,
    ) -> Result<Self, WireError> {
        let message = serde_json::to_value(message).map_err(WireError::Encode)?;
        Ok(Self { message_type: std::any::type_name::<T>().to_string(), message, data, publish })
    }

    /// Deserialize the message body as `T`, failing if the envelope's tag
    /// doesn't match `T`'s type name.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, WireError> {
        let expected = std::any::type_name::<T>();
        if self.message_type != expected {
            return Err(WireError::MessageTypeMismatch {
                expected,
                actual: self.message_type.clone(),
            });
        }
        serde_json::from_value(self.message.clone()).map_err(WireError::Decode)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(WireError::Decode)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
