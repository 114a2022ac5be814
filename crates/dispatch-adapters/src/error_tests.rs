// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn missing_metadata_has_a_stable_message() {
    assert_eq!(AdaptersError::MissingMetadata.to_string(), "module archive is missing module.json");
}
