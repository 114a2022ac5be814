// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Entry-command argument templating: `%module%`, `%version%`, `%release%`,
//! `%releasedate%`, `%name%`, `%description%`, `%author%`, `%hostprocessid%`,
//! matched case-insensitively. Unknown variables are left as-is.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use dispatch_store::metadata::ModuleMetadata;
use regex::Regex;

#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([a-zA-Z]+)%").expect("constant regex pattern is valid"));

/// Build the substitution table for one supervised release.
pub fn entry_command_vars(release: &str, metadata: &ModuleMetadata) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    vars.insert("module".to_string(), metadata.module.clone());
    vars.insert("version".to_string(), metadata.version.clone());
    vars.insert("release".to_string(), release.to_string());
    vars.insert("releasedate".to_string(), metadata.release_date.clone());
    vars.insert("name".to_string(), metadata.name.clone());
    vars.insert("description".to_string(), metadata.description.clone());
    vars.insert("author".to_string(), metadata.author.clone());
    vars.insert("hostprocessid".to_string(), std::process::id().to_string());
    vars
}

/// Substitute `%var%` placeholders, matching variable names case-insensitively.
pub fn interpolate(template: &str, vars: &BTreeMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let key = caps[1].to_lowercase();
            match vars.get(&key) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Split a templated argument string on whitespace after interpolation.
pub fn interpolate_arguments(template: &str, vars: &BTreeMap<String, String>) -> Vec<String> {
    interpolate(template, vars).split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
