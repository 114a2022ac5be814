// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Path Mapper: the path→end-point and module→(prefixes, end-point) lookup
//! the (out-of-scope) HTTP middleware glue consults. Updated by the
//! installation manager as modules start and stop.

use std::collections::BTreeMap;

use dispatch_core::module::ModuleIdentifier;
use parking_lot::RwLock;

#[derive(Default)]
pub struct PathMap {
    by_prefix: RwLock<BTreeMap<String, String>>,
    by_module: RwLock<BTreeMap<ModuleIdentifier, (Vec<String>, String)>>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `module` with `end_point`, reachable under every path in
    /// `prefixes`. Replaces any prior registration for `module`.
    pub fn register(&self, module: ModuleIdentifier, end_point: impl Into<String>, prefixes: Vec<String>) {
        let end_point = end_point.into();
        self.unregister(&module);
        {
            let mut by_prefix = self.by_prefix.write();
            for prefix in &prefixes {
                by_prefix.insert(prefix.clone(), end_point.clone());
            }
        }
        self.by_module.write().insert(module, (prefixes, end_point));
    }

    /// Drop `module`'s registration and every path prefix it owned.
    pub fn unregister(&self, module: &ModuleIdentifier) {
        if let Some((prefixes, _)) = self.by_module.write().remove(module) {
            let mut by_prefix = self.by_prefix.write();
            for prefix in prefixes {
                by_prefix.remove(&prefix);
            }
        }
    }

    /// The end-point registered for the longest matching prefix of `path`,
    /// if any.
    pub fn resolve(&self, path: &str) -> Option<String> {
        self.by_prefix
            .read()
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, end_point)| end_point.clone())
    }

    /// The end-point registered for `module`, if any.
    pub fn end_point_for(&self, module: &ModuleIdentifier) -> Option<String> {
        self.by_module.read().get(module).map(|(_, end_point)| end_point.clone())
    }
}

#[cfg(test)]
#[path = "path_map_tests.rs"]
mod tests;
