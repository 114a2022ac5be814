// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Thin client over a daemon's physical transport listener: connect, send
//! one envelope, read back the result.

use dispatch_wire::{read_message, write_message, WireDispatchResult, WireEnvelope, WireError};
use tokio::net::TcpStream;

pub struct DaemonClient {
    stream: TcpStream,
}

impl DaemonClient {
    pub async fn connect(bind_addr: &str) -> Result<Self, WireError> {
        let stream = TcpStream::connect(bind_addr).await?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, envelope: &WireEnvelope) -> Result<WireDispatchResult, WireError> {
        write_message(&mut self.stream, &envelope.to_bytes()?).await?;
        let response = read_message(&mut self.stream).await?;
        serde_json::from_slice(&response).map_err(WireError::Decode)
    }
}
