// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn defaults_match_the_documented_values() {
    let config = Config::default();
    assert_eq!(config.lease_length_secs, 30);
    assert_eq!(config.lease_length_ms(), 30_000);
    assert_eq!(config.log_level, "info");
}

#[test]
fn load_fills_in_missing_fields_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dispatchd.toml");
    std::fs::write(&path, r#"bind_addr = "0.0.0.0:9000""#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.lease_length_secs, 30);
}

#[test]
fn load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dispatchd.toml");
    std::fs::write(&path, "not = [valid").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
