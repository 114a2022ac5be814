// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Cluster coordination primitives: sessions, the hierarchical entry
//! namespace they own, and the persisted session record.

use smol_str::SmolStr;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A cluster-wide liveness token held by one process.
///
/// `prefix` is monotonically increasing time-plus-counter bytes unique per
/// process; `physical_address` is the transport address that owns the
/// session. Sessions are opaque tokens: equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct CoordinationSession {
    prefix: SmolStr,
    physical_address: SmolStr,
}

static SESSION_COUNTER: AtomicU32 = AtomicU32::new(0);

impl CoordinationSession {
    /// Generate a new session for this process, bound to `physical_address`.
    ///
    /// `prefix` encodes `epoch_ms` (16 hex chars, zero-padded) followed by a
    /// per-process monotonic counter (8 hex chars), so sessions minted later
    /// by the same process always sort after earlier ones.
    pub fn generate(epoch_ms: u64, physical_address: impl Into<SmolStr>) -> Self {
        let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let prefix = format!("{epoch_ms:016x}-{counter:08x}");
        Self { prefix: SmolStr::new(prefix), physical_address: physical_address.into() }
    }

    /// Reconstruct a session from its wire-visible parts (e.g. after
    /// deserializing a coordination entry path segment).
    pub fn from_parts(prefix: impl Into<SmolStr>, physical_address: impl Into<SmolStr>) -> Self {
        Self { prefix: prefix.into(), physical_address: physical_address.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn physical_address(&self) -> &str {
        &self.physical_address
    }

    /// Wire-visible session identifier, used as the last segment of
    /// `/routes/<endPoint>/<sessionId>`.
    pub fn id(&self) -> String {
        self.prefix.to_string()
    }
}

impl fmt::Display for CoordinationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.prefix, self.physical_address)
    }
}

/// Ordered sequence of path segments forming a hierarchical coordination
/// namespace key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct CoordinationEntryPath(Vec<SmolStr>);

impl CoordinationEntryPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a `/`-joined path, ignoring leading/trailing/empty segments.
    pub fn parse(path: &str) -> Self {
        Self::from_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.0
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<SmolStr>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is `other` or a descendant of `other`.
    pub fn starts_with(&self, other: &CoordinationEntryPath) -> bool {
        self.0.len() >= other.0.len() && self.0[..other.0.len()] == other.0[..]
    }
}

impl fmt::Display for CoordinationEntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

/// Persisted record for one [`CoordinationSession`].
///
/// Invariants, enforced by [`crate::session::StoredSession`]'s mutators and the
/// session-manager contract, not by this type alone:
/// - `lease_end` is monotonically extended until `is_ended` is set.
/// - Once `is_ended == true`, `entry_paths` is the set of entries still
///   awaiting cleanup; once empty, the record itself is deleted.
/// - `storage_version` increments on every update (optimistic concurrency).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredSession {
    pub session: CoordinationSession,
    pub lease_end_ms: u64,
    pub storage_version: u64,
    pub entry_paths: BTreeSet<CoordinationEntryPath>,
    pub is_ended: bool,
}

impl StoredSession {
    /// A fresh record at `storage_version == 0`.
    pub fn new(session: CoordinationSession, lease_end_ms: u64) -> Self {
        Self {
            session,
            lease_end_ms,
            storage_version: 0,
            entry_paths: BTreeSet::new(),
            is_ended: false,
        }
    }

    /// True if the record represents a still-live session as of `now_ms`.
    pub fn is_alive(&self, now_ms: u64) -> bool {
        !self.is_ended && self.lease_end_ms > now_ms
    }

    /// True once the record is fully torn down: ended and drained.
    pub fn is_reclaimable(&self) -> bool {
        self.is_ended && self.entry_paths.is_empty()
    }

    /// Produce the next version of this record with an extended lease.
    pub fn with_renewed_lease(&self, new_lease_end_ms: u64) -> Self {
        let mut next = self.clone();
        next.lease_end_ms = next.lease_end_ms.max(new_lease_end_ms);
        next.storage_version += 1;
        next
    }

    pub fn with_ended(&self) -> Self {
        let mut next = self.clone();
        next.is_ended = true;
        next.storage_version += 1;
        next
    }

    pub fn with_entry_added(&self, path: CoordinationEntryPath) -> Self {
        let mut next = self.clone();
        next.entry_paths.insert(path);
        next.storage_version += 1;
        next
    }

    pub fn with_entry_removed(&self, path: &CoordinationEntryPath) -> Self {
        let mut next = self.clone();
        next.entry_paths.remove(path);
        next.storage_version += 1;
        next
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
