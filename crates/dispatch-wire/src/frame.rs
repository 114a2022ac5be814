// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Length-prefixed message framing: a 4-byte big-endian length prefix
//! followed by the payload bytes.

use crate::error::WireError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are rejected before the length-declared payload
/// is read, so a corrupt or hostile prefix can't force an unbounded
/// allocation.
pub const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Write `payload` as one frame: a 4-byte big-endian length prefix followed
/// by the bytes themselves.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), WireError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| WireError::FrameTooLarge { size: payload.len(), limit: u32::MAX as usize })?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame, rejecting frames over [`MAX_FRAME_BYTES`].
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, WireError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(WireError::FrameTooLarge { size: len, limit: MAX_FRAME_BYTES });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
