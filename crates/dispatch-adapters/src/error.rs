// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Errors raised by the physical transport, process supervision, and
//! module-archive installation adapters.

#[derive(Debug, thiserror::Error)]
pub enum AdaptersError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wire(#[from] dispatch_wire::WireError),

    #[error("malformed dispatch result on the wire")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    #[error("module archive is missing module.json")]
    MissingMetadata,

    #[error("process exited before it could be observed")]
    ProcessAlreadyExited,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
