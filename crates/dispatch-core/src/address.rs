// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Logical end-point addressing.

use smol_str::SmolStr;
use std::fmt;

/// Opaque byte sequence identifying a logical application end-point.
///
/// Equality is by byte content. The [`EndPointAddress::unknown`] singleton
/// marks "no mapping" and is distinct from every address with a non-empty
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct EndPointAddress(SmolStr);

impl EndPointAddress {
    /// Construct an address from its logical name.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    /// The `Unknown` singleton: "no mapping".
    pub fn unknown() -> Self {
        Self(SmolStr::new_static(""))
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EndPointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for EndPointAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EndPointAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
