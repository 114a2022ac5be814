// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Validation errors raised by the core data model.

use thiserror::Error;

/// Errors raised constructing or validating core value types. Every other
/// crate in the workspace layers its own error enum on top of this one
/// rather than re-deriving these variants.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid module version `{text}`: {source}")]
    InvalidModuleVersion {
        text: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid module version range `{text}`: {source}")]
    InvalidVersionRange {
        text: String,
        #[source]
        source: semver::Error,
    },

    #[error("entry path segment must not be empty")]
    EmptyEntryPathSegment,

    #[error("endpoint address must not be empty; use EndPointAddress::unknown() instead")]
    EmptyEndPointAddress,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
