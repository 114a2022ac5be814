// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::address::EndPointAddress;
use crate::session::{CoordinationEntryPath, CoordinationSession, StoredSession};

/// Proptest strategies for core value types.
#[cfg(feature = "proptest")]
pub mod strategies {
    use crate::dispatch_result::{DispatchResult, ValidationIssue};
    use crate::module::ModuleVersion;
    use proptest::prelude::*;

    pub fn arb_module_version() -> impl Strategy<Value = ModuleVersion> {
        (0u64..50, 0u64..50, 0u64..50)
            .prop_map(|(major, minor, patch)| ModuleVersion::new(semver::Version::new(major, minor, patch)))
    }

    pub fn arb_validation_issue() -> impl Strategy<Value = ValidationIssue> {
        ("[a-z]{1,8}", "[a-z ]{1,32}").prop_map(|(field, message)| ValidationIssue::new(field, message))
    }

    /// Non-recursive leaf outcomes; deliberately excludes `Aggregate` so
    /// callers can build bounded-depth aggregates themselves.
    pub fn arb_leaf_dispatch_result() -> impl Strategy<Value = DispatchResult> {
        prop_oneof![
            Just(DispatchResult::Success),
            "[a-z ]{1,32}".prop_map(DispatchResult::failure),
            prop::collection::vec(arb_validation_issue(), 0..4).prop_map(DispatchResult::validation_failure),
            Just(DispatchResult::ConcurrencyIssue),
            Just(DispatchResult::NotAuthorized),
            Just(DispatchResult::NotAuthenticated),
            Just(DispatchResult::EntityNotFound),
            Just(DispatchResult::NotDispatched),
        ]
    }
}

/// A session generated for a fixed test instant, bound to a throwaway
/// address.
pub fn test_session(epoch_ms: u64) -> CoordinationSession {
    CoordinationSession::generate(epoch_ms, "test-node")
}

/// A freshly begun, unexpired [`StoredSession`] with a lease ending
/// `lease_ms` after `epoch_ms`.
pub fn test_stored_session(epoch_ms: u64, lease_ms: u64) -> StoredSession {
    StoredSession::new(test_session(epoch_ms), epoch_ms + lease_ms)
}

pub fn test_entry_path(segments: &[&str]) -> CoordinationEntryPath {
    CoordinationEntryPath::from_segments(segments.iter().copied())
}

pub fn test_endpoint(name: &str) -> EndPointAddress {
    EndPointAddress::new(name)
}
