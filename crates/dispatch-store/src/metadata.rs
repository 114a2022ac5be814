// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! `module.json` metadata: the file a module release's zip package carries
//! alongside its payload, describing identity, the entry command the
//! supervisor spawns, and its dependencies.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use dispatch_core::module::{ModuleIdentifier, ModuleReleaseIdentifier, ModuleVersion, ModuleVersionRange};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleMetadata {
    pub module: String,
    pub version: String,
    #[serde(rename = "release-date")]
    pub release_date: String,
    pub name: String,
    pub description: String,
    pub author: String,
    #[serde(rename = "entry-command")]
    pub entry_command: String,
    #[serde(rename = "entry-arguments")]
    pub entry_arguments: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl ModuleMetadata {
    pub fn release_identifier(&self) -> Result<ModuleReleaseIdentifier, StoreError> {
        Ok(ModuleReleaseIdentifier::new(
            ModuleIdentifier::new(self.module.as_str()),
            ModuleVersion::parse(&self.version)
                .map_err(|source| StoreError::Metadata(serde::de::Error::custom(source)))?,
        ))
    }

    /// The dependency ranges this release declares, parsed from its
    /// `dependencies` map.
    pub fn version_ranges(&self) -> Result<Vec<ModuleVersionRange>, StoreError> {
        self.dependencies
            .iter()
            .map(|(module, range)| {
                let range = semver::VersionReq::parse(range)
                    .map_err(|source| StoreError::Metadata(serde::de::Error::custom(source)))?;
                Ok(ModuleVersionRange::new(ModuleIdentifier::new(module.as_str()), range))
            })
            .collect()
    }
}

#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Read and parse the `module.json` found under `release_dir`.
    async fn read(&self, release_dir: &Path) -> Result<ModuleMetadata, StoreError>;
}

/// Reads `<release_dir>/module.json` off the local filesystem.
pub struct FileMetadataReader;

#[async_trait]
impl MetadataReader for FileMetadataReader {
    async fn read(&self, release_dir: &Path) -> Result<ModuleMetadata, StoreError> {
        let bytes = tokio::fs::read(release_dir.join("module.json")).await?;
        serde_json::from_slice(&bytes).map_err(StoreError::Metadata)
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
