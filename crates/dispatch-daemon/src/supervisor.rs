// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Module Supervisor: owns one release's child process across its whole
//! lifecycle (spawn, crash, respawn, graceful dispose), driven by the state
//! table in the module documentation.

use std::path::PathBuf;
use std::time::Duration;

use dispatch_adapters::ModuleProcess;
use dispatch_core::module::ModuleReleaseIdentifier;
use dispatch_store::metadata::ModuleMetadata;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::events::{ModuleStartedEvent, ModuleTerminatedEvent};
use crate::template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Initializing,
    NotRunning,
    Running,
    Failed,
    Shutdown,
}

#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    Started(ModuleStartedEvent),
    Terminated(ModuleTerminatedEvent),
}

#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    pub terminate_timeout: Duration,
    pub restart_backoff: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self { terminate_timeout: Duration::from_millis(2500), restart_backoff: Duration::from_secs(1) }
    }
}

/// Owns the background task that drives one release's child process. The
/// supervisor itself is cheap to hold onto; all the state lives in the
/// task, observed through `state()` and published events.
pub struct ModuleSupervisor {
    release: ModuleReleaseIdentifier,
    state: watch::Receiver<SupervisorState>,
    dispose_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ModuleSupervisor {
    pub fn start(
        release: ModuleReleaseIdentifier,
        metadata: ModuleMetadata,
        install_dir: PathBuf,
        config: SupervisorConfig,
        events: mpsc::UnboundedSender<SupervisorEvent>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(SupervisorState::Initializing);
        let (dispose_tx, dispose_rx) = oneshot::channel();

        let task = tokio::spawn(run(
            release.clone(),
            metadata,
            install_dir,
            config,
            events,
            state_tx,
            dispose_rx,
        ));

        Self { release, state: state_rx, dispose_tx: Some(dispose_tx), task }
    }

    pub fn release(&self) -> &ModuleReleaseIdentifier {
        &self.release
    }

    pub fn state(&self) -> SupervisorState {
        *self.state.borrow()
    }

    /// Gracefully terminate the child process (if running) and stop the
    /// supervisor task, waiting for it to finish.
    pub async fn dispose(mut self) {
        if let Some(tx) = self.dispose_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

async fn run(
    release: ModuleReleaseIdentifier,
    metadata: ModuleMetadata,
    install_dir: PathBuf,
    config: SupervisorConfig,
    events: mpsc::UnboundedSender<SupervisorEvent>,
    state_tx: watch::Sender<SupervisorState>,
    mut dispose_rx: oneshot::Receiver<()>,
) {
    if metadata.entry_command.trim().is_empty() {
        let _ = state_tx.send(SupervisorState::Shutdown);
        return;
    }
    let _ = state_tx.send(SupervisorState::NotRunning);

    let vars = template::entry_command_vars(&release.to_string(), &metadata);
    let args = template::interpolate_arguments(&metadata.entry_arguments, &vars);
    let program = install_dir.join(&metadata.entry_command).to_string_lossy().to_string();

    loop {
        let mut process = match ModuleProcess::spawn(metadata.name.clone(), &program, &args) {
            Ok(process) => process,
            Err(error) => {
                warn!(%error, release = %release, "failed to spawn module process");
                let _ = state_tx.send(SupervisorState::Failed);
                if wait_for_backoff_or_dispose(&mut dispose_rx, config.restart_backoff).await.is_err() {
                    let _ = state_tx.send(SupervisorState::Shutdown);
                    return;
                }
                continue;
            }
        };

        let _ = state_tx.send(SupervisorState::Running);
        let _ = events.send(SupervisorEvent::Started(ModuleStartedEvent { release: release.clone() }));

        tokio::select! {
            _ = &mut dispose_rx => {
                let _ = process.terminate(config.terminate_timeout).await;
                let _ = events.send(SupervisorEvent::Terminated(ModuleTerminatedEvent { release: release.clone() }));
                let _ = state_tx.send(SupervisorState::Shutdown);
                return;
            }
            exit = process.wait() => {
                match exit {
                    Ok(status) => info!(release = %release, %status, "module process exited"),
                    Err(error) => warn!(release = %release, %error, "module process wait failed"),
                }
                let _ = events.send(SupervisorEvent::Terminated(ModuleTerminatedEvent { release: release.clone() }));
                let _ = state_tx.send(SupervisorState::Failed);
                if wait_for_backoff_or_dispose(&mut dispose_rx, config.restart_backoff).await.is_err() {
                    let _ = state_tx.send(SupervisorState::Shutdown);
                    return;
                }
            }
        }
    }
}

/// Wait out the restart backoff, or bail early (`Err`) if disposed first.
async fn wait_for_backoff_or_dispose(
    dispose_rx: &mut oneshot::Receiver<()>,
    backoff: Duration,
) -> Result<(), ()> {
    tokio::select! {
        _ = &mut *dispose_rx => Err(()),
        _ = tokio::time::sleep(backoff) => Ok(()),
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
