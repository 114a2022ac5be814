// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Backtracking installation-set planner.
//!
//! Depth-first search over one release choice per module, with unit
//! propagation (a module with only one remaining candidate is assigned
//! immediately on the next pop) falling out naturally from always picking
//! the frontier's next module and trying its candidates in preference
//! order; failed partial assignments are memoized so the same dead end
//! isn't re-explored via a different path through the frontier.

use std::collections::{BTreeMap, HashSet, VecDeque};

use dispatch_core::module::{
    ModuleIdentifier, ModuleReleaseIdentifier, ModuleVersion, ModuleVersionRange,
    ResolvedInstallationSet, UnresolvedInstallationSet,
};
use futures::future::BoxFuture;
use semver::VersionReq;

use crate::catalog::DependencyCatalog;
use crate::error::ResolverError;

type Assignment = BTreeMap<ModuleIdentifier, ModuleVersion>;
type ConstraintMap = BTreeMap<ModuleIdentifier, Vec<ModuleVersionRange>>;

/// Plan a concrete [`ResolvedInstallationSet`] satisfying `unresolved`.
///
/// Among satisfying assignments, prefers the highest stable version for
/// each module encountered first in the search, falling back to
/// pre-release versions only when no stable one is available.
pub async fn resolve(
    unresolved: &UnresolvedInstallationSet,
    catalog: &dyn DependencyCatalog,
) -> Result<ResolvedInstallationSet, ResolverError> {
    let mut constraints: ConstraintMap = BTreeMap::new();
    for constraint in &unresolved.constraints {
        constraints.entry(constraint.module.clone()).or_default().push(constraint.clone());
    }

    let frontier: VecDeque<ModuleIdentifier> = unresolved.requested.iter().cloned().collect();
    let mut assignment = Assignment::new();
    let mut dead_ends = HashSet::new();

    match search(catalog, frontier, &mut assignment, &mut constraints, &mut dead_ends).await? {
        true => Ok(ResolvedInstallationSet::new(assignment)),
        false => Err(ResolverError::Conflict { requested: unresolved.requested.clone() }),
    }
}

fn signature(assignment: &Assignment) -> Vec<(ModuleIdentifier, ModuleVersion)> {
    assignment.iter().map(|(module, version)| (module.clone(), version.clone())).collect()
}

fn sort_candidates(candidates: &mut [ModuleReleaseIdentifier]) {
    candidates.sort_by(|a, b| {
        let a_is_prerelease = !a.version.as_semver().pre.is_empty();
        let b_is_prerelease = !b.version.as_semver().pre.is_empty();
        a_is_prerelease.cmp(&b_is_prerelease).then_with(|| b.version.cmp(&a.version))
    });
}

fn search<'a>(
    catalog: &'a dyn DependencyCatalog,
    mut frontier: VecDeque<ModuleIdentifier>,
    assignment: &'a mut Assignment,
    constraints: &'a mut ConstraintMap,
    dead_ends: &'a mut HashSet<Vec<(ModuleIdentifier, ModuleVersion)>>,
) -> BoxFuture<'a, Result<bool, ResolverError>> {
    Box::pin(async move {
        let Some(module) = frontier.pop_front() else {
            return Ok(true);
        };

        if assignment.contains_key(&module) {
            return search(catalog, frontier, assignment, constraints, dead_ends).await;
        }

        let key = signature(assignment);
        if dead_ends.contains(&key) {
            return Ok(false);
        }

        let ranges = constraints.get(&module).cloned().unwrap_or_default();
        let primary = ranges
            .first()
            .cloned()
            .unwrap_or_else(|| ModuleVersionRange::new(module.clone(), VersionReq::STAR));

        let mut candidates = catalog.matching_releases(&primary).await;
        candidates.retain(|release| ranges.iter().all(|range| range.matches(&release.version)));
        sort_candidates(&mut candidates);

        if candidates.is_empty() {
            tracing::debug!(module = %module, "no candidate release satisfies all constraints");
        }

        for candidate in candidates {
            assignment.insert(module.clone(), candidate.version.clone());

            let deps = catalog.dependencies(&candidate).await;
            let mut added = Vec::new();
            let mut next_frontier = frontier.clone();
            for dep in &deps {
                let list = constraints.entry(dep.module.clone()).or_default();
                if !list.contains(dep) {
                    list.push(dep.clone());
                    added.push(dep.clone());
                }
                if !assignment.contains_key(&dep.module) && !next_frontier.contains(&dep.module) {
                    next_frontier.push_back(dep.module.clone());
                }
            }

            if search(catalog, next_frontier, assignment, constraints, dead_ends).await? {
                return Ok(true);
            }

            assignment.remove(&module);
            for dep in &added {
                if let Some(list) = constraints.get_mut(&dep.module) {
                    list.retain(|r| r != dep);
                }
            }
        }

        dead_ends.insert(key);
        Ok(false)
    })
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
