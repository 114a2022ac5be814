// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Remote Dispatcher: resolves a target end-point through the router,
//! bypasses the network entirely when the target is this process, and
//! otherwise serializes the message over the wire.

use std::any::Any;
use std::sync::Arc;

use dispatch_core::{DispatchData, DispatchResult};
use dispatch_engine::LocalDispatcher;
use dispatch_wire::WireEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::router::EndPointRouter;

/// Maximum number of resolve-then-send attempts for a single (non-publish)
/// dispatch. A session-terminated target surfaces as either an empty
/// resolve or a transport failure; one retry gives a freshly-cleaned-up
/// route a chance to reflect reality.
const MAX_SEND_ATTEMPTS: usize = 2;

pub struct RemoteDispatcher {
    local: Arc<LocalDispatcher>,
    router: Arc<EndPointRouter>,
    own_physical_address: String,
}

impl RemoteDispatcher {
    pub fn new(
        local: Arc<LocalDispatcher>,
        router: Arc<EndPointRouter>,
        own_physical_address: impl Into<String>,
    ) -> Self {
        Self { local, router, own_physical_address: own_physical_address.into() }
    }

    /// Dispatch `data`, optionally to a named `end_point`; otherwise the
    /// message type's registered default route is consulted. `T` is the
    /// message's concrete Rust type, needed to serialize it onto the wire
    /// if the target isn't this process.
    pub async fn dispatch<T>(
        &self,
        data: DispatchData,
        end_point: Option<&str>,
        publish: bool,
    ) -> DispatchResult
    where
        T: Any + Send + Sync + Serialize + DeserializeOwned,
    {
        let end_point = match end_point {
            Some(name) => Some(name.to_string()),
            None => match self.router.resolve_type_default(data.message_type().name()).await {
                Ok(found) => found,
                Err(error) => return DispatchResult::failure(error.to_string()),
            },
        };

        let Some(end_point) = end_point else {
            return self.local.dispatch(data, publish).await;
        };

        if publish {
            self.dispatch_broadcast::<T>(data, &end_point).await
        } else {
            self.dispatch_single::<T>(data, &end_point).await
        }
    }

    async fn dispatch_broadcast<T>(&self, data: DispatchData, end_point: &str) -> DispatchResult
    where
        T: Any + Send + Sync + Serialize + DeserializeOwned,
    {
        let envelope = match self.encode::<T>(&data, true) {
            Ok(envelope) => envelope,
            Err(result) => return result,
        };
        match self.router.broadcast(end_point, &envelope).await {
            Ok(wire_result) => wire_result.to_core(),
            Err(error) => DispatchResult::failure(error.to_string()),
        }
    }

    async fn dispatch_single<T>(&self, data: DispatchData, end_point: &str) -> DispatchResult
    where
        T: Any + Send + Sync + Serialize + DeserializeOwned,
    {
        for attempt in 1..=MAX_SEND_ATTEMPTS {
            let addresses = match self.router.resolve(end_point).await {
                Ok(addresses) => addresses,
                Err(error) => return DispatchResult::failure(error.to_string()),
            };

            if addresses.iter().any(|address| address == &self.own_physical_address) {
                return self.local.dispatch(data.clone_payload(), false).await;
            }
            if addresses.is_empty() {
                return DispatchResult::NotDispatched;
            }

            let envelope = match self.encode::<T>(&data, false) {
                Ok(envelope) => envelope,
                Err(result) => return result,
            };
            match self.router.send(end_point, &envelope).await {
                Ok(wire_result) => return wire_result.to_core(),
                Err(error) if attempt < MAX_SEND_ATTEMPTS => {
                    warn!(%end_point, %error, "remote dispatch failed, re-resolving and retrying");
                }
                Err(error) => return DispatchResult::failure(error.to_string()),
            }
        }
        DispatchResult::NotDispatched
    }

    fn encode<T>(&self, data: &DispatchData, publish: bool) -> Result<WireEnvelope, DispatchResult>
    where
        T: Any + Send + Sync + Serialize,
    {
        let message = data
            .downcast::<T>()
            .ok_or_else(|| DispatchResult::failure("message type mismatch for wire encoding"))?;
        WireEnvelope::encode(message, data.data().clone(), publish)
            .map_err(|error| DispatchResult::failure(error.to_string()))
    }
}

#[cfg(test)]
#[path = "remote_dispatcher_tests.rs"]
mod tests;
