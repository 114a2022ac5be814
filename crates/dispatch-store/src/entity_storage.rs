// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! General-purpose optimistic-concurrency key/value storage for entities
//! outside the session namespace (installation-set records, handler
//! configuration snapshots, and similar daemon state).

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;

use crate::error::StoreError;

#[async_trait]
pub trait EntityStorage: Send + Sync {
    /// Current value and its version, or `None` if no record exists at
    /// `key`.
    async fn get(&self, key: &str) -> Result<Option<(JsonValue, u64)>, StoreError>;

    /// Write `value` at `key`. `expected_version: None` means "create,
    /// fail if a record already exists"; `Some(v)` means "update, subject
    /// to a compare-and-swap on `v`". Returns the new version.
    async fn put(
        &self,
        key: &str,
        value: JsonValue,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError>;

    async fn delete(&self, key: &str, expected_version: u64) -> Result<(), StoreError>;

    /// Keys with the given prefix, in lexicographic order.
    async fn list_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Default)]
pub struct InMemoryEntityStorage {
    entries: Mutex<BTreeMap<String, (JsonValue, u64)>>,
}

impl InMemoryEntityStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStorage for InMemoryEntityStorage {
    async fn get(&self, key: &str) -> Result<Option<(JsonValue, u64)>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        value: JsonValue,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreError> {
        let mut guard = self.entries.lock();
        match (guard.get(key), expected_version) {
            (Some(_), None) => {
                return Err(StoreError::ConcurrencyConflict { expected: 0, actual: guard[key].1 })
            }
            (None, Some(expected)) => {
                return Err(StoreError::ConcurrencyConflict { expected, actual: 0 })
            }
            (Some((_, actual)), Some(expected)) if *actual != expected => {
                return Err(StoreError::ConcurrencyConflict { expected, actual: *actual })
            }
            _ => {}
        }
        let next_version = expected_version.map_or(0, |v| v + 1);
        guard.insert(key.to_string(), (value, next_version));
        Ok(next_version)
    }

    async fn delete(&self, key: &str, expected_version: u64) -> Result<(), StoreError> {
        let mut guard = self.entries.lock();
        let (_, actual) = guard.get(key).ok_or(StoreError::NotFound)?;
        if *actual != expected_version {
            return Err(StoreError::ConcurrencyConflict { expected: expected_version, actual: *actual });
        }
        guard.remove(key);
        Ok(())
    }

    async fn list_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
#[path = "entity_storage_tests.rs"]
mod tests;
