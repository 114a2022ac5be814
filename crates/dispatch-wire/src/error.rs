// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Errors raised encoding, decoding, or framing wire messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to read frame: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {size} bytes exceeds the {limit}-byte maximum")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("failed to encode JSON payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode JSON payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("envelope tagged `{actual}` does not match expected message type `{expected}`")]
    MessageTypeMismatch { expected: &'static str, actual: String },

    #[error("dispatch result carries an opaque typed value of `{type_name}` with no known wire representation")]
    UnserializableTyped { type_name: &'static str },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
