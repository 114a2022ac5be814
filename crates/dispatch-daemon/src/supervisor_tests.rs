// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use dispatch_core::module::{ModuleIdentifier, ModuleVersion};
use std::collections::BTreeMap;
use std::time::Duration;

fn release() -> ModuleReleaseIdentifier {
    ModuleReleaseIdentifier::new(ModuleIdentifier::new("billing"), ModuleVersion::parse("1.0.0").unwrap())
}

fn metadata(entry_command: &str) -> ModuleMetadata {
    metadata_with_args(entry_command, "")
}

fn metadata_with_args(entry_command: &str, entry_arguments: &str) -> ModuleMetadata {
    ModuleMetadata {
        module: "billing".to_string(),
        version: "1.0.0".to_string(),
        release_date: "2026-01-01".to_string(),
        name: "Billing".to_string(),
        description: "Billing module".to_string(),
        author: "Acme".to_string(),
        entry_command: entry_command.to_string(),
        entry_arguments: entry_arguments.to_string(),
        dependencies: BTreeMap::new(),
    }
}

async fn wait_for_state(supervisor: &ModuleSupervisor, target: SupervisorState, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    while supervisor.state() != target {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {target:?}, currently {:?}", supervisor.state());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn shuts_down_immediately_with_no_entry_command() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let supervisor = ModuleSupervisor::start(
        release(),
        metadata(""),
        std::env::temp_dir(),
        SupervisorConfig::default(),
        tx,
    );
    wait_for_state(&supervisor, SupervisorState::Shutdown, Duration::from_secs(1)).await;
    supervisor.dispose().await;
}

#[tokio::test]
async fn starts_the_process_and_publishes_started() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = ModuleSupervisor::start(
        release(),
        metadata_with_args("/bin/sleep", "5"),
        std::env::temp_dir(),
        SupervisorConfig { terminate_timeout: Duration::from_millis(200), restart_backoff: Duration::from_millis(100) },
        tx,
    );

    wait_for_state(&supervisor, SupervisorState::Running, Duration::from_secs(1)).await;
    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert!(matches!(event, SupervisorEvent::Started(_)));

    supervisor.dispose().await;
}

#[tokio::test]
async fn disposing_terminates_the_process_and_publishes_terminated() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let supervisor = ModuleSupervisor::start(
        release(),
        metadata_with_args("/bin/sleep", "5"),
        std::env::temp_dir(),
        SupervisorConfig { terminate_timeout: Duration::from_millis(200), restart_backoff: Duration::from_millis(100) },
        tx.clone(),
    );
    wait_for_state(&supervisor, SupervisorState::Running, Duration::from_secs(1)).await;

    supervisor.dispose().await;

    let mut saw_terminated = false;
    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
        if matches!(event, SupervisorEvent::Terminated(_)) {
            saw_terminated = true;
        }
    }
    assert!(saw_terminated);
}
