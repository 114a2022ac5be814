// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! JSON wire representation of [`dispatch_core::DispatchResult`].
//!
//! `DispatchResult::Typed` carries an opaque `Arc<dyn Any>` with no general
//! serialization strategy, so converting one to the wire requires the
//! caller to have already reduced it to a `serde_json::Value` (by
//! downcasting to the concrete type it knows applies). On the way back, a
//! wire `Typed` value always decodes into a `DispatchResult::typed` holding
//! a plain `serde_json::Value` — callers on the receiving end of a network
//! hop only ever get JSON back, never the original Rust type.

use dispatch_core::dispatch_result::ValidationIssue;
use dispatch_core::DispatchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::WireError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireValidationIssue {
    pub field: String,
    pub message: String,
}

impl From<&ValidationIssue> for WireValidationIssue {
    fn from(issue: &ValidationIssue) -> Self {
        Self { field: issue.field.clone(), message: issue.message.clone() }
    }
}

impl From<WireValidationIssue> for ValidationIssue {
    fn from(issue: WireValidationIssue) -> Self {
        ValidationIssue::new(issue.field, issue.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "dispatch-result-type", content = "dispatch-result")]
pub enum WireDispatchResult {
    Success,
    Failure { message: String },
    ValidationFailure { issues: Vec<WireValidationIssue> },
    ConcurrencyIssue,
    NotAuthorized,
    NotAuthenticated,
    EntityNotFound,
    NotDispatched,
    Aggregate { children: Vec<WireDispatchResult> },
    Typed { type_name: String, value: JsonValue },
}

impl WireDispatchResult {
    /// Convert a [`DispatchResult`] to its wire form. `Typed` values are
    /// carried over only when the opaque value is itself a
    /// `serde_json::Value` (produced by a caller that already serialized
    /// its concrete type); anything else has no general wire
    /// representation.
    pub fn from_core(result: &DispatchResult) -> Result<Self, WireError> {
        Ok(match result {
            DispatchResult::Success => Self::Success,
            DispatchResult::Failure { message } => Self::Failure { message: message.clone() },
            DispatchResult::ValidationFailure { issues } => Self::ValidationFailure {
                issues: issues.iter().map(WireValidationIssue::from).collect(),
            },
            DispatchResult::ConcurrencyIssue => Self::ConcurrencyIssue,
            DispatchResult::NotAuthorized => Self::NotAuthorized,
            DispatchResult::NotAuthenticated => Self::NotAuthenticated,
            DispatchResult::EntityNotFound => Self::EntityNotFound,
            DispatchResult::NotDispatched => Self::NotDispatched,
            DispatchResult::Aggregate { children } => {
                let children = children
                    .iter()
                    .map(Self::from_core)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::Aggregate { children }
            }
            DispatchResult::Typed { type_name, .. } => {
                let value = result
                    .as_typed::<JsonValue>()
                    .ok_or(WireError::UnserializableTyped { type_name: *type_name })?;
                Self::Typed { type_name: type_name.to_string(), value: value.clone() }
            }
        })
    }

    pub fn to_core(&self) -> DispatchResult {
        match self {
            Self::Success => DispatchResult::Success,
            Self::Failure { message } => DispatchResult::failure(message.clone()),
            Self::ValidationFailure { issues } => DispatchResult::validation_failure(
                issues.iter().cloned().map(ValidationIssue::from).collect(),
            ),
            Self::ConcurrencyIssue => DispatchResult::ConcurrencyIssue,
            Self::NotAuthorized => DispatchResult::NotAuthorized,
            Self::NotAuthenticated => DispatchResult::NotAuthenticated,
            Self::EntityNotFound => DispatchResult::EntityNotFound,
            Self::NotDispatched => DispatchResult::NotDispatched,
            Self::Aggregate { children } => {
                DispatchResult::aggregate(children.iter().map(Self::to_core).collect())
            }
            Self::Typed { value, .. } => DispatchResult::typed(value.clone()),
        }
    }
}

#[cfg(test)]
#[path = "dispatch_result_tests.rs"]
mod tests;
