// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn conflict_message_lists_the_requested_modules() {
    let err = ResolverError::Conflict { requested: vec![ModuleIdentifier::new("payments")] };
    assert!(err.to_string().contains("payments"));
}
