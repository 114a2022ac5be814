// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Errors raised while planning an installation set.

use dispatch_core::module::ModuleIdentifier;

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// No combination of releases satisfies every requested module's
    /// version constraints.
    #[error("no installation set satisfies the requested modules: {requested:?}")]
    Conflict { requested: Vec<ModuleIdentifier> },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
