// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn success_and_typed_are_success() {
    assert!(DispatchResult::Success.is_success());
    assert!(DispatchResult::typed("pong".to_string()).is_success());
}

#[test]
fn plain_failure_variants_are_not_success() {
    for result in [
        DispatchResult::failure("boom"),
        DispatchResult::ConcurrencyIssue,
        DispatchResult::NotAuthorized,
        DispatchResult::NotAuthenticated,
        DispatchResult::EntityNotFound,
        DispatchResult::NotDispatched,
    ] {
        assert!(!result.is_success());
    }
}

#[test]
fn aggregate_success_iff_all_children_succeed() {
    let all_ok = DispatchResult::aggregate(vec![DispatchResult::Success, DispatchResult::Success]);
    assert!(all_ok.is_success());

    let one_failed =
        DispatchResult::aggregate(vec![DispatchResult::Success, DispatchResult::failure("boom")]);
    assert!(!one_failed.is_success());

    let empty = DispatchResult::aggregate(vec![]);
    assert!(empty.is_success(), "vacuous truth: no child failed");
}

#[test]
fn typed_downcast_round_trips() {
    let result = DispatchResult::typed(42u32);
    assert_eq!(result.as_typed::<u32>(), Some(&42));
    assert_eq!(result.as_typed::<String>(), None);
}

#[test]
fn wire_tags_are_stable_strings() {
    assert_eq!(DispatchResult::Success.wire_tag(), "success");
    assert_eq!(DispatchResult::NotDispatched.wire_tag(), "not-dispatched");
    assert_eq!(
        DispatchResult::aggregate(vec![]).wire_tag(),
        "aggregate"
    );
}
