// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Session Owner: establishes this process's cluster session and keeps its
//! lease renewed in the background, disposing itself if the session is ever
//! declared terminated out from under it.

use std::sync::Arc;
use std::time::Duration;

use dispatch_core::session::CoordinationSession;
use dispatch_core::{Clock, SystemClock};
use dispatch_store::SessionStorage;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Owns this process's [`CoordinationSession`]: establishes it, renews its
/// lease every `lease_length / 2`, and ends it on [`SessionOwner::dispose`]
/// or self-disposes if the storage layer ever reports the session gone.
pub struct SessionOwner {
    session_rx: watch::Receiver<Option<CoordinationSession>>,
    renewal: JoinHandle<()>,
    disposed_tx: Option<oneshot::Sender<()>>,
}

impl SessionOwner {
    /// Start establishing a session bound to `physical_address`, using the
    /// system clock, then spawn the renewal loop. Returns immediately;
    /// callers await [`SessionOwner::session`] to learn the established
    /// session id.
    pub fn start(
        storage: Arc<dyn SessionStorage>,
        physical_address: impl Into<String>,
        lease_length_ms: u64,
    ) -> Self {
        Self::start_with_clock(storage, SystemClock, physical_address, lease_length_ms)
    }

    /// Like [`SessionOwner::start`], but driven by an explicit [`Clock`] so
    /// lease arithmetic can be controlled deterministically in tests.
    pub fn start_with_clock<C: Clock>(
        storage: Arc<dyn SessionStorage>,
        clock: C,
        physical_address: impl Into<String>,
        lease_length_ms: u64,
    ) -> Self {
        let physical_address = physical_address.into();
        let (session_tx, session_rx) = watch::channel(None);
        let (disposed_tx, disposed_rx) = oneshot::channel();

        let renewal = tokio::spawn(renewal_loop(
            storage,
            clock,
            physical_address,
            lease_length_ms,
            session_tx,
            disposed_rx,
        ));

        Self { session_rx, renewal, disposed_tx: Some(disposed_tx) }
    }

    /// Await establishment and return the session id. Resolves once for
    /// every caller once the factory task succeeds.
    pub async fn session(&self) -> CoordinationSession {
        let mut rx = self.session_rx.clone();
        loop {
            if let Some(session) = rx.borrow().clone() {
                return session;
            }
            if rx.changed().await.is_err() {
                // The renewal task exited without ever establishing a
                // session; keep waiting on the (closed) channel's last
                // value rather than panicking a caller.
                if let Some(session) = rx.borrow().clone() {
                    return session;
                }
            }
        }
    }

    /// Stop renewal and end the session, waiting for the background task
    /// to finish.
    pub async fn dispose(mut self) {
        if let Some(tx) = self.disposed_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.renewal).await;
    }
}

async fn renewal_loop<C: Clock>(
    storage: Arc<dyn SessionStorage>,
    clock: C,
    physical_address: String,
    lease_length_ms: u64,
    session_tx: watch::Sender<Option<CoordinationSession>>,
    mut disposed_rx: oneshot::Receiver<()>,
) {
    let session = CoordinationSession::generate(clock.epoch_ms(), physical_address);
    let mut record = loop {
        match storage.try_begin(session.clone(), clock.epoch_ms() + lease_length_ms).await {
            Ok(record) => break record,
            Err(error) => {
                warn!(%error, "session establishment retrying");
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }
    };
    info!(session = %session, "session established");
    let _ = session_tx.send(Some(session.clone()));

    let renew_every = Duration::from_millis((lease_length_ms / 2).max(1));
    loop {
        tokio::select! {
            _ = &mut disposed_rx => {
                let _ = storage.end(&session, record.storage_version).await;
                info!(session = %session, "session disposed");
                return;
            }
            _ = tokio::time::sleep(renew_every) => {
                let new_lease_end = clock.epoch_ms() + lease_length_ms;
                match storage.update_lease(&session, record.storage_version, new_lease_end).await {
                    Ok(updated) => record = updated,
                    Err(error) => {
                        warn!(session = %session, %error, "session terminated, self-disposing");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "session_owner_tests.rs"]
mod tests;
