// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! The catalog a planner consults: what releases satisfy a version range,
//! and what a release in turn depends on.

use async_trait::async_trait;
use dispatch_core::module::{ModuleReleaseIdentifier, ModuleVersionRange};

#[async_trait]
pub trait DependencyCatalog: Send + Sync {
    /// Releases that satisfy `requirement`, in no particular order; the
    /// planner sorts candidates itself.
    async fn matching_releases(&self, requirement: &ModuleVersionRange) -> Vec<ModuleReleaseIdentifier>;

    /// The version ranges `release` depends on.
    async fn dependencies(&self, release: &ModuleReleaseIdentifier) -> Vec<ModuleVersionRange>;
}
