// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Physical transport: delivers a wire envelope to a remote process's
//! physical address and returns its dispatch result.

use async_trait::async_trait;
use dispatch_wire::{read_message, write_message, WireDispatchResult, WireEnvelope};
use tokio::net::TcpStream;

use crate::error::AdaptersError;

#[async_trait]
pub trait PhysicalTransport: Send + Sync {
    /// Deliver `request` to `address` (a `host:port` pair) and return the
    /// remote dispatcher's result.
    async fn send(
        &self,
        address: &str,
        request: &WireEnvelope,
    ) -> Result<WireDispatchResult, AdaptersError>;
}

/// Delivers one request per connection over TCP, using `dispatch-wire`'s
/// length-prefixed framing for both the request and the response.
pub struct TcpTransport;

#[async_trait]
impl PhysicalTransport for TcpTransport {
    async fn send(
        &self,
        address: &str,
        request: &WireEnvelope,
    ) -> Result<WireDispatchResult, AdaptersError> {
        let mut stream = TcpStream::connect(address).await?;
        let payload = request.to_bytes().map_err(AdaptersError::Wire)?;
        write_message(&mut stream, &payload).await.map_err(AdaptersError::Wire)?;

        let response = read_message(&mut stream).await.map_err(AdaptersError::Wire)?;
        serde_json::from_slice(&response).map_err(AdaptersError::Decode)
    }
}

/// An in-memory [`PhysicalTransport`] that routes by address string to a
/// set of locally registered handler closures, for tests that need a
/// transport without a real socket.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeTransport {
    handlers: parking_lot::Mutex<
        std::collections::BTreeMap<
            String,
            Box<dyn Fn(&WireEnvelope) -> Result<WireDispatchResult, AdaptersError> + Send + Sync>,
        >,
    >,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeTransport {
    fn default() -> Self {
        Self { handlers: parking_lot::Mutex::new(std::collections::BTreeMap::new()) }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `address`, replacing any prior one.
    pub fn on(
        &self,
        address: impl Into<String>,
        handler: impl Fn(&WireEnvelope) -> Result<WireDispatchResult, AdaptersError> + Send + Sync + 'static,
    ) {
        self.handlers.lock().insert(address.into(), Box::new(handler));
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl PhysicalTransport for FakeTransport {
    async fn send(
        &self,
        address: &str,
        request: &WireEnvelope,
    ) -> Result<WireDispatchResult, AdaptersError> {
        let guard = self.handlers.lock();
        match guard.get(address) {
            Some(handler) => handler(request),
            None => Err(AdaptersError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("no fake transport registered for {address}"),
            ))),
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
