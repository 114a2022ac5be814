// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Persisted session storage: optimistic-concurrency CRUD over
//! [`StoredSession`] records, plus the wait primitives the daemon's
//! reconciliation loop and session owner use instead of polling.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dispatch_core::session::{CoordinationEntryPath, CoordinationSession, StoredSession};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::StoreError;

#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Create a new session record. Fails if one already exists for this
    /// session.
    async fn try_begin(
        &self,
        session: CoordinationSession,
        lease_end_ms: u64,
    ) -> Result<StoredSession, StoreError>;

    /// Extend a session's lease, subject to a compare-and-swap on
    /// `expected_version`.
    async fn update_lease(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        new_lease_end_ms: u64,
    ) -> Result<StoredSession, StoreError>;

    /// Mark a session ended, subject to a compare-and-swap on
    /// `expected_version`.
    async fn end(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
    ) -> Result<StoredSession, StoreError>;

    async fn add_entry(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        path: CoordinationEntryPath,
    ) -> Result<StoredSession, StoreError>;

    async fn remove_entry(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        path: &CoordinationEntryPath,
    ) -> Result<StoredSession, StoreError>;

    async fn get_entries(
        &self,
        session: &CoordinationSession,
    ) -> Result<Vec<CoordinationEntryPath>, StoreError>;

    async fn is_alive(&self, session: &CoordinationSession, now_ms: u64) -> Result<bool, StoreError>;

    async fn get_sessions(&self) -> Result<Vec<StoredSession>, StoreError>;

    /// Resolve once `session` is ended or no longer exists. Resolves
    /// immediately if already the case.
    async fn wait_for_termination(&self, session: &CoordinationSession);

    /// Resolve with the first session observed ending after this call
    /// began, whether by explicit `end` or by the lease reaper marking an
    /// expired lease. Used by callers that want to re-scan the full
    /// session table on termination rather than track one session.
    async fn wait_for_any_termination(&self) -> StoredSession;
}

/// In-process [`SessionStorage`] backed by a mutex-guarded map, suitable for
/// a single-node daemon or tests. A clustered deployment swaps this for a
/// store backed by shared coordination storage; the trait is the seam.
#[derive(Default)]
pub struct InMemorySessionStorage {
    sessions: Mutex<BTreeMap<CoordinationSession, StoredSession>>,
    changed: Notify,
    terminated: Notify,
    last_terminated: Mutex<Option<(u64, StoredSession)>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn cas_update(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        mutate: impl FnOnce(&StoredSession) -> StoredSession,
    ) -> Result<StoredSession, StoreError> {
        let mut guard = self.sessions.lock();
        let current = guard.get(session).ok_or(StoreError::NotFound)?;
        if current.storage_version != expected_version {
            return Err(StoreError::ConcurrencyConflict {
                expected: expected_version,
                actual: current.storage_version,
            });
        }
        let next = mutate(current);
        guard.insert(session.clone(), next.clone());
        drop(guard);
        self.changed.notify_waiters();
        Ok(next)
    }

    fn record_termination(&self, session: StoredSession) {
        let mut guard = self.last_terminated.lock();
        let next_seq = guard.as_ref().map_or(0, |(seq, _)| seq + 1);
        *guard = Some((next_seq, session));
        drop(guard);
        self.terminated.notify_waiters();
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn try_begin(
        &self,
        session: CoordinationSession,
        lease_end_ms: u64,
    ) -> Result<StoredSession, StoreError> {
        let mut guard = self.sessions.lock();
        if let Some(existing) = guard.get(&session) {
            return Err(StoreError::ConcurrencyConflict {
                expected: 0,
                actual: existing.storage_version,
            });
        }
        let record = StoredSession::new(session.clone(), lease_end_ms);
        guard.insert(session, record.clone());
        drop(guard);
        self.changed.notify_waiters();
        Ok(record)
    }

    async fn update_lease(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        new_lease_end_ms: u64,
    ) -> Result<StoredSession, StoreError> {
        self.cas_update(session, expected_version, |s| s.with_renewed_lease(new_lease_end_ms))
    }

    async fn end(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
    ) -> Result<StoredSession, StoreError> {
        let ended = self.cas_update(session, expected_version, StoredSession::with_ended)?;
        self.record_termination(ended.clone());
        Ok(ended)
    }

    async fn add_entry(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        path: CoordinationEntryPath,
    ) -> Result<StoredSession, StoreError> {
        self.cas_update(session, expected_version, |s| s.with_entry_added(path.clone()))
    }

    async fn remove_entry(
        &self,
        session: &CoordinationSession,
        expected_version: u64,
        path: &CoordinationEntryPath,
    ) -> Result<StoredSession, StoreError> {
        self.cas_update(session, expected_version, |s| s.with_entry_removed(path))
    }

    async fn get_entries(
        &self,
        session: &CoordinationSession,
    ) -> Result<Vec<CoordinationEntryPath>, StoreError> {
        let guard = self.sessions.lock();
        let record = guard.get(session).ok_or(StoreError::NotFound)?;
        Ok(record.entry_paths.iter().cloned().collect())
    }

    async fn is_alive(&self, session: &CoordinationSession, now_ms: u64) -> Result<bool, StoreError> {
        let guard = self.sessions.lock();
        Ok(guard.get(session).is_some_and(|record| record.is_alive(now_ms)))
    }

    async fn get_sessions(&self) -> Result<Vec<StoredSession>, StoreError> {
        Ok(self.sessions.lock().values().cloned().collect())
    }

    async fn wait_for_termination(&self, session: &CoordinationSession) {
        loop {
            let notified = self.changed.notified();
            {
                let guard = self.sessions.lock();
                match guard.get(session) {
                    None => return,
                    Some(record) if record.is_ended => return,
                    _ => {}
                }
            }
            notified.await;
        }
    }

    async fn wait_for_any_termination(&self) -> StoredSession {
        let start_seq = self.last_terminated.lock().as_ref().map(|(seq, _)| *seq);
        loop {
            let notified = self.terminated.notified();
            {
                let guard = self.last_terminated.lock();
                if let Some((seq, session)) = guard.as_ref() {
                    if Some(*seq) != start_seq {
                        return session.clone();
                    }
                }
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[path = "session_storage_tests.rs"]
mod tests;
