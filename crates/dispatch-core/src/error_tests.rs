// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn invalid_module_version_message_names_the_offending_text() {
    let err = CoreError::InvalidModuleVersion {
        text: "not-a-version".to_string(),
        source: semver::Version::parse("not-a-version").unwrap_err(),
    };
    assert!(err.to_string().contains("not-a-version"));
}

#[test]
fn empty_entry_path_segment_has_a_fixed_message() {
    assert_eq!(
        CoreError::EmptyEntryPathSegment.to_string(),
        "entry path segment must not be empty"
    );
}
