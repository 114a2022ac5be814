// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Inbound side of the physical transport: a TCP listener that decodes one
//! `WireEnvelope` per connection, dispatches it against the local handler
//! registry, and writes back the resulting `WireDispatchResult`.
//!
//! Decoding an inbound envelope requires recovering its concrete Rust
//! message type from the wire tag's type-name string; [`WireHandlerRegistry`]
//! holds one decode closure per message type, registered alongside the
//! handler itself so the two stay in sync.

use std::any::Any;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use dispatch_core::{DispatchData, DispatchResult};
use dispatch_engine::LocalDispatcher;
use dispatch_wire::{read_message, write_message, WireDispatchResult, WireEnvelope, WireError};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("no wire handler registered for message type `{0}`")]
    UnknownMessageType(String),
}

type Decoder = Box<dyn Fn(&WireEnvelope) -> Result<DispatchData, WireError> + Send + Sync>;

/// Maps a wire envelope's `message_type` tag back to a concrete Rust type,
/// so an inbound connection can decode a request without the listener
/// knowing every message type at compile time.
#[derive(Default)]
pub struct WireHandlerRegistry {
    decoders: RwLock<BTreeMap<String, Decoder>>,
}

impl WireHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the wire decoder for `T`, replacing any prior registration
    /// for the same type.
    pub fn register<T>(&self)
    where
        T: Any + Send + Sync + DeserializeOwned,
    {
        let type_name = std::any::type_name::<T>().to_string();
        self.decoders.write().insert(
            type_name,
            Box::new(|envelope: &WireEnvelope| {
                let message: T = envelope.decode()?;
                Ok(DispatchData::new(message, envelope.data.clone()))
            }),
        );
    }

    fn decode(&self, envelope: &WireEnvelope) -> Result<DispatchData, ServerError> {
        match self.decoders.read().get(&envelope.message_type) {
            Some(decoder) => Ok(decoder(envelope)?),
            None => Err(ServerError::UnknownMessageType(envelope.message_type.clone())),
        }
    }
}

/// Accepts physical-transport connections and dispatches each request
/// locally, using the `publish` flag the originating call site carried
/// over the wire.
pub struct DispatchServer {
    listener: TcpListener,
    local: Arc<LocalDispatcher>,
    handlers: Arc<WireHandlerRegistry>,
}

impl DispatchServer {
    pub async fn bind(
        bind_addr: &str,
        local: Arc<LocalDispatcher>,
        handlers: Arc<WireHandlerRegistry>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(bind_addr).await?;
        Ok(Self { listener, local, handlers })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the process exits; each connection is
    /// handled on its own task so a slow or stalled peer can't block
    /// others.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(%addr, "accepted physical transport connection");
                    let local = Arc::clone(&self.local);
                    let handlers = Arc::clone(&self.handlers);
                    tokio::spawn(async move {
                        if let Err(error) = handle_connection(stream, &local, &handlers).await {
                            warn!(%error, %addr, "physical transport connection failed");
                        }
                    });
                }
                Err(error) => error!(%error, "accept failed"),
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    local: &LocalDispatcher,
    handlers: &WireHandlerRegistry,
) -> Result<(), ServerError> {
    let request_bytes = read_message(&mut stream).await?;
    let envelope = WireEnvelope::from_bytes(&request_bytes)?;

    let result = match handlers.decode(&envelope) {
        Ok(data) => local.dispatch(data, envelope.publish).await,
        Err(error) => {
            warn!(%error, message_type = %envelope.message_type, "failed to decode inbound envelope");
            DispatchResult::failure(error.to_string())
        }
    };

    let wire_result = WireDispatchResult::from_core(&result)?;
    let response_bytes = serde_json::to_vec(&wire_result).map_err(WireError::Encode)?;
    write_message(&mut stream, &response_bytes).await?;
    Ok(())
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
