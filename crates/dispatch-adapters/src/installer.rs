// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Extracts a module release's zip package to its install directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use dispatch_core::module::ModuleReleaseIdentifier;

use crate::error::AdaptersError;

pub struct ModuleInstaller;

impl ModuleInstaller {
    /// Extract the zip archive at `archive_path` into
    /// `<install_root>/<release>/`, returning that directory. Fails if the
    /// archive doesn't carry a `module.json` at its root.
    pub fn install(
        &self,
        archive_path: &Path,
        install_root: &Path,
        release: &ModuleReleaseIdentifier,
    ) -> Result<PathBuf, AdaptersError> {
        let target_dir = install_root.join(release.to_string());
        std::fs::create_dir_all(&target_dir)?;

        let file = File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&target_dir)?;

        if !target_dir.join("module.json").is_file() {
            return Err(AdaptersError::MissingMetadata);
        }
        Ok(target_dir)
    }

    /// Remove a previously installed release's directory, retrying once on
    /// a transient filesystem error.
    pub fn remove(&self, install_root: &Path, release: &ModuleReleaseIdentifier) -> Result<(), AdaptersError> {
        let target_dir = install_root.join(release.to_string());
        match std::fs::remove_dir_all(&target_dir) {
            Ok(()) | Err(_) if !target_dir.exists() => Ok(()),
            Err(_) => std::fs::remove_dir_all(&target_dir).map_err(AdaptersError::Io),
        }
    }
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
