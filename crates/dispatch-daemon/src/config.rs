// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Daemon configuration: a TOML file with defaults for every field.

use std::path::{Path, PathBuf};

use serde::Deserialize;

fn default_bind_addr() -> String {
    "127.0.0.1:7420".to_string()
}

fn default_lease_length_secs() -> u64 {
    30
}

fn default_install_root() -> PathBuf {
    PathBuf::from("/var/lib/dispatchd/installed")
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("/var/lib/dispatchd/modules")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_lease_length_secs")]
    pub lease_length_secs: u64,
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            lease_length_secs: default_lease_length_secs(),
            install_root: default_install_root(),
            modules_dir: default_modules_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn lease_length_ms(&self) -> u64 {
        self.lease_length_secs.saturating_mul(1000)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
