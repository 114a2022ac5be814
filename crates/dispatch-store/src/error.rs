// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Storage-layer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record found")]
    NotFound,

    #[error("optimistic concurrency conflict: expected version {expected}, found {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },

    #[error("session already ended")]
    SessionAlreadyEnded,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse module metadata: {0}")]
    Metadata(#[source] serde_json::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
