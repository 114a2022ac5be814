// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Module identity, versioning, and the resolved/unresolved installation-set
//! shapes the dependency resolver plans over.

use semver::{Version, VersionReq};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// A module's stable name, independent of version (e.g. `payments`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModuleIdentifier(SmolStr);

impl ModuleIdentifier {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A module's semantic version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ModuleVersion(Version);

impl ModuleVersion {
    pub fn new(version: Version) -> Self {
        Self(version)
    }

    pub fn parse(text: &str) -> Result<Self, semver::Error> {
        Version::parse(text).map(Self)
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published build of a module: its identifier paired with a concrete
/// version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ModuleReleaseIdentifier {
    pub module: ModuleIdentifier,
    pub version: ModuleVersion,
}

impl ModuleReleaseIdentifier {
    pub fn new(module: ModuleIdentifier, version: ModuleVersion) -> Self {
        Self { module, version }
    }
}

impl fmt::Display for ModuleReleaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.module, self.version)
    }
}

/// A dependency constraint: a module identifier plus the version range a
/// dependent accepts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModuleVersionRange {
    pub module: ModuleIdentifier,
    #[serde(with = "version_req_serde")]
    pub range: VersionReq,
}

impl ModuleVersionRange {
    pub fn new(module: ModuleIdentifier, range: VersionReq) -> Self {
        Self { module, range }
    }

    pub fn matches(&self, version: &ModuleVersion) -> bool {
        self.range.matches(version.as_semver())
    }
}

mod version_req_serde {
    use semver::VersionReq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(range: &VersionReq, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(range)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VersionReq, D::Error> {
        let text = String::deserialize(deserializer)?;
        VersionReq::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// A request to install one module release per identifier named in a
/// dependency graph, not yet checked for satisfiability.
#[derive(Debug, Clone, Default)]
pub struct UnresolvedInstallationSet {
    pub requested: Vec<ModuleIdentifier>,
    pub constraints: Vec<ModuleVersionRange>,
}

impl UnresolvedInstallationSet {
    pub fn new(requested: Vec<ModuleIdentifier>, constraints: Vec<ModuleVersionRange>) -> Self {
        Self { requested, constraints }
    }

    /// Constraints that apply to a given module, in declaration order.
    pub fn constraints_for<'a>(
        &'a self,
        module: &'a ModuleIdentifier,
    ) -> impl Iterator<Item = &'a ModuleVersionRange> {
        self.constraints.iter().filter(move |c| &c.module == module)
    }
}

/// A satisfiability-checked plan: exactly one release per module identifier,
/// with every dependent's [`ModuleVersionRange`] satisfied.
#[derive(Debug, Clone, Default)]
pub struct ResolvedInstallationSet {
    releases: BTreeMap<ModuleIdentifier, ModuleVersion>,
}

impl ResolvedInstallationSet {
    pub fn new(releases: BTreeMap<ModuleIdentifier, ModuleVersion>) -> Self {
        Self { releases }
    }

    pub fn version_of(&self, module: &ModuleIdentifier) -> Option<&ModuleVersion> {
        self.releases.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleIdentifier> {
        self.releases.keys()
    }

    pub fn releases(&self) -> impl Iterator<Item = ModuleReleaseIdentifier> + '_ {
        self.releases
            .iter()
            .map(|(module, version)| ModuleReleaseIdentifier::new(module.clone(), version.clone()))
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
