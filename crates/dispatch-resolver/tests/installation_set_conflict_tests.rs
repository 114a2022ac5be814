// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! End-to-end: two modules pinned to incompatible versions of a shared
//! dependency yield no resolved installation set.

use async_trait::async_trait;
use dispatch_core::module::{
    ModuleIdentifier, ModuleReleaseIdentifier, ModuleVersion, ModuleVersionRange,
    UnresolvedInstallationSet,
};
use dispatch_resolver::{resolve, DependencyCatalog, ResolverError};
use semver::VersionReq;

fn release(module: &str, version: &str) -> ModuleReleaseIdentifier {
    ModuleReleaseIdentifier::new(ModuleIdentifier::new(module), ModuleVersion::parse(version).expect("version"))
}

fn range(module: &str, req: &str) -> ModuleVersionRange {
    ModuleVersionRange::new(ModuleIdentifier::new(module), VersionReq::parse(req).expect("requirement"))
}

struct FixedCatalog {
    releases: Vec<(ModuleReleaseIdentifier, Vec<ModuleVersionRange>)>,
}

#[async_trait]
impl DependencyCatalog for FixedCatalog {
    async fn matching_releases(&self, requirement: &ModuleVersionRange) -> Vec<ModuleReleaseIdentifier> {
        self.releases
            .iter()
            .map(|(release, _)| release.clone())
            .filter(|r| r.module == requirement.module && requirement.range.matches(r.version.as_semver()))
            .collect()
    }

    async fn dependencies(&self, target: &ModuleReleaseIdentifier) -> Vec<ModuleVersionRange> {
        self.releases.iter().find(|(r, _)| r == target).map(|(_, deps)| deps.clone()).unwrap_or_default()
    }
}

/// S6. `A` depends on `C==1`, `B` depends on `C==2`: no candidate satisfies
/// both, so the desired installation set has zero valid resolutions.
#[tokio::test]
async fn incompatible_shared_dependency_versions_yield_no_resolution() {
    let catalog = FixedCatalog {
        releases: vec![
            (release("a", "1.0.0"), vec![range("c", "=1.0.0")]),
            (release("b", "1.0.0"), vec![range("c", "=2.0.0")]),
            (release("c", "1.0.0"), vec![]),
            (release("c", "2.0.0"), vec![]),
        ],
    };
    let unresolved = UnresolvedInstallationSet::new(
        vec![ModuleIdentifier::new("a"), ModuleIdentifier::new("b")],
        vec![range("a", ">=1"), range("b", ">=1")],
    );

    let err = resolve(&unresolved, &catalog).await.unwrap_err();

    match err {
        ResolverError::Conflict { requested } => {
            assert!(requested.contains(&ModuleIdentifier::new("a")));
            assert!(requested.contains(&ModuleIdentifier::new("b")));
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}
