// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn successive_contexts_get_distinct_ids() {
    let a = DispatchContext::new();
    let b = DispatchContext::new();
    assert_ne!(a.dispatch_id(), b.dispatch_id());
}
