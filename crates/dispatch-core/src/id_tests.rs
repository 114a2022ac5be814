// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_round_trips_through_display() {
    let id = TestId::new();
    let back = TestId::from_string(id.as_str());
    assert_eq!(id, back);
    assert!(id.as_str().starts_with("tst-"));
}

#[test]
fn define_id_hash_map_lookup_by_str() {
    let mut map = HashMap::new();
    map.insert(TestId::from_string("tst-fixed"), 42);
    assert_eq!(map.get("tst-fixed"), Some(&42));
}

#[test]
fn define_id_new_generates_unique_ids() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
#[should_panic]
fn idbuf_new_rejects_oversize_in_debug() {
    let too_long = "x".repeat(ID_MAX_LEN + 1);
    IdBuf::new(&too_long);
}

#[test]
fn idbuf_empty_is_empty() {
    assert!(IdBuf::empty().is_empty());
    assert!(!IdBuf::new("a").is_empty());
}
