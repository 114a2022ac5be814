// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Marks sessions ended once their lease passes without renewal.
//!
//! [`SessionOwner`](crate::session_owner::SessionOwner) ends a session
//! promptly when it disposes cleanly or loses a renewal race against
//! another writer, but a session whose owning process vanishes outright
//! (crash, network partition) just stops renewing — nothing else declares
//! it over. This is the task that notices: it polls the session table and
//! flips `is_ended` on anything past its lease, which is what wakes
//! `EndPointRouter::run_cleanup` and any other `wait_for_any_termination`
//! waiter.

use std::sync::Arc;
use std::time::Duration;

use dispatch_core::Clock;
use dispatch_store::SessionStorage;
use tracing::warn;

/// Run forever, checking every `poll_interval` for sessions whose lease has
/// passed `clock`'s current time and ending them.
pub async fn run<C: Clock>(sessions: Arc<dyn SessionStorage>, clock: C, poll_interval: Duration) {
    loop {
        tokio::time::sleep(poll_interval).await;
        if let Err(error) = reap_once(&sessions, &clock).await {
            warn!(%error, "lease reaper pass failed");
        }
    }
}

async fn reap_once<C: Clock>(
    sessions: &Arc<dyn SessionStorage>,
    clock: &C,
) -> Result<(), dispatch_store::StoreError> {
    let now = clock.epoch_ms();
    for record in sessions.get_sessions().await? {
        if record.is_ended || record.is_alive(now) {
            continue;
        }
        match sessions.end(&record.session, record.storage_version).await {
            Ok(_) | Err(dispatch_store::StoreError::ConcurrencyConflict { .. }) => {}
            Err(dispatch_store::StoreError::NotFound) => {}
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "lease_reaper_tests.rs"]
mod tests;
