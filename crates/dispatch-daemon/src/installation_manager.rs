// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Module Installation Manager: reconciles a resolved installation set
//! against the set of currently-supervised module releases.
//!
//! A single [`tokio::sync::Mutex`] serializes calls to
//! [`ModuleInstallationManager::configure_installation_set`] end to end;
//! within one call, stopping and starting each run concurrently across
//! modules but sequentially within a module's own install/start sequence.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use dispatch_adapters::{AdaptersError, ModuleInstaller};
use dispatch_core::module::ModuleReleaseIdentifier;
use dispatch_core::ResolvedInstallationSet;
use dispatch_store::metadata::ModuleMetadata;
use dispatch_store::{MetadataReader, StoreError};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::path_map::PathMap;
use crate::supervisor::{ModuleSupervisor, SupervisorConfig, SupervisorEvent};

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Install(#[from] AdaptersError),

    #[error(transparent)]
    Metadata(#[from] StoreError),
}

pub struct ModuleInstallationManager {
    installer: ModuleInstaller,
    metadata_reader: Arc<dyn MetadataReader>,
    install_root: PathBuf,
    archive_dir: PathBuf,
    supervisor_config: SupervisorConfig,
    events: mpsc::UnboundedSender<SupervisorEvent>,
    path_map: Arc<PathMap>,
    supervisors: Mutex<BTreeMap<ModuleReleaseIdentifier, ModuleSupervisor>>,
}

impl ModuleInstallationManager {
    pub fn new(
        metadata_reader: Arc<dyn MetadataReader>,
        install_root: PathBuf,
        archive_dir: PathBuf,
        supervisor_config: SupervisorConfig,
        events: mpsc::UnboundedSender<SupervisorEvent>,
        path_map: Arc<PathMap>,
    ) -> Self {
        Self {
            installer: ModuleInstaller,
            metadata_reader,
            install_root,
            archive_dir,
            supervisor_config,
            events,
            path_map,
            supervisors: Mutex::new(BTreeMap::new()),
        }
    }

    /// Releases currently under supervision.
    pub async fn running_releases(&self) -> BTreeSet<ModuleReleaseIdentifier> {
        self.supervisors.lock().await.keys().cloned().collect()
    }

    /// On process start, list existing install directories: adopt any whose
    /// metadata names a release still present in `resolved`, delete the
    /// rest.
    pub async fn adopt_existing(&self, resolved: &ResolvedInstallationSet) -> Result<(), InstallError> {
        let target: BTreeSet<ModuleReleaseIdentifier> = resolved.releases().collect();
        let mut entries = match tokio::fs::read_dir(&self.install_root).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(error.into()),
        };

        let mut guard = self.supervisors.lock().await;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match self.metadata_reader.read(&path).await {
                Ok(metadata) => {
                    let release = metadata.release_identifier()?;
                    if target.contains(&release) {
                        info!(release = %release, "adopting existing module install");
                        self.register_paths(&release, &metadata);
                        let supervisor = ModuleSupervisor::start(
                            release.clone(),
                            metadata,
                            path,
                            self.supervisor_config,
                            self.events.clone(),
                        );
                        guard.insert(release, supervisor);
                    } else {
                        info!(path = %path.display(), "removing stale module install");
                        let _ = tokio::fs::remove_dir_all(&path).await;
                    }
                }
                Err(error) => {
                    warn!(%error, path = %path.display(), "unreadable module install, removing");
                    let _ = tokio::fs::remove_dir_all(&path).await;
                }
            }
        }
        Ok(())
    }

    /// Reconcile supervised releases to exactly `resolved`.
    pub async fn configure_installation_set(
        &self,
        resolved: ResolvedInstallationSet,
    ) -> Result<(), InstallError> {
        let mut guard = self.supervisors.lock().await;
        let running: BTreeSet<ModuleReleaseIdentifier> = guard.keys().cloned().collect();
        let target: BTreeSet<ModuleReleaseIdentifier> = resolved.releases().collect();

        let to_stop: Vec<ModuleReleaseIdentifier> = running.difference(&target).cloned().collect();
        let to_start: Vec<ModuleReleaseIdentifier> = target.difference(&running).cloned().collect();

        let stops = to_stop.into_iter().map(|release| {
            let supervisor = guard.remove(&release).expect("release came from guard's own keys");
            let install_root = self.install_root.clone();
            let path_map = Arc::clone(&self.path_map);
            async move {
                path_map.unregister(&release.module);
                supervisor.dispose().await;
                let target_dir = install_root.join(release.to_string());
                if let Err(error) = tokio::fs::remove_dir_all(&target_dir).await {
                    if error.kind() != std::io::ErrorKind::NotFound {
                        warn!(%error, release = %release, "failed to remove install directory");
                    }
                }
            }
        });
        futures::future::join_all(stops).await;

        let starts = to_start.iter().map(|release| self.start_one(release));
        let started = futures::future::join_all(starts).await;
        for (release, outcome) in to_start.into_iter().zip(started) {
            match outcome {
                Ok(supervisor) => {
                    guard.insert(release, supervisor);
                }
                Err(error) => warn!(%error, release = %release, "failed to start module release"),
            }
        }
        Ok(())
    }

    async fn start_one(&self, release: &ModuleReleaseIdentifier) -> Result<ModuleSupervisor, InstallError> {
        let archive_path = self.archive_dir.join(format!("{release}.zip"));
        let install_dir = self.installer.install(&archive_path, &self.install_root, release)?;
        let metadata = self.metadata_reader.read(&install_dir).await?;
        self.register_paths(release, &metadata);
        Ok(ModuleSupervisor::start(
            release.clone(),
            metadata,
            install_dir,
            self.supervisor_config,
            self.events.clone(),
        ))
    }

    fn register_paths(&self, release: &ModuleReleaseIdentifier, metadata: &ModuleMetadata) {
        let module = release.module.clone();
        let prefix = format!("/{}", module.as_str());
        self.path_map.register(module, metadata.name.clone(), vec![prefix]);
    }
}

#[cfg(test)]
#[path = "installation_manager_tests.rs"]
mod tests;
