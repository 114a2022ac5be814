// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Structured dispatch outcomes.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One entry in a [`DispatchResult::ValidationFailure`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Tagged-union outcome of a dispatch.
#[derive(Clone)]
pub enum DispatchResult {
    Success,
    Failure { message: String },
    ValidationFailure { issues: Vec<ValidationIssue> },
    ConcurrencyIssue,
    NotAuthorized,
    NotAuthenticated,
    EntityNotFound,
    /// No registered handler accepted the message.
    NotDispatched,
    /// Commutative aggregation of a `publish` dispatch's per-handler
    /// results; success iff every child succeeds.
    Aggregate { children: Vec<DispatchResult> },
    /// A handler-produced typed value, carried as a boxed `Any` so the
    /// dispatcher doesn't need a generic return type.
    Typed { value: Arc<dyn Any + Send + Sync>, type_name: &'static str },
}

impl DispatchResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure { message: message.into() }
    }

    pub fn validation_failure(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationFailure { issues }
    }

    pub fn aggregate(children: Vec<DispatchResult>) -> Self {
        Self::Aggregate { children }
    }

    pub fn typed<T: Any + Send + Sync>(value: T) -> Self {
        Self::Typed { value: Arc::new(value), type_name: std::any::type_name::<T>() }
    }

    /// Recover a typed value from a `Typed` result.
    pub fn as_typed<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Typed { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// `Aggregate` succeeds iff every child succeeds; every other variant's
    /// success is intrinsic to the variant.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Success | Self::Typed { .. } => true,
            Self::Aggregate { children } => children.iter().all(DispatchResult::is_success),
            Self::Failure { .. }
            | Self::ValidationFailure { .. }
            | Self::ConcurrencyIssue
            | Self::NotAuthorized
            | Self::NotAuthenticated
            | Self::EntityNotFound
            | Self::NotDispatched => false,
        }
    }

    /// A human-readable message for logs and the CLI.
    pub fn message(&self) -> String {
        match self {
            Self::Success => "success".to_string(),
            Self::Failure { message } => format!("failure: {message}"),
            Self::ValidationFailure { issues } => {
                let joined = issues
                    .iter()
                    .map(|i| format!("{}: {}", i.field, i.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("validation failure: {joined}")
            }
            Self::ConcurrencyIssue => "concurrency issue".to_string(),
            Self::NotAuthorized => "not authorized".to_string(),
            Self::NotAuthenticated => "not authenticated".to_string(),
            Self::EntityNotFound => "entity not found".to_string(),
            Self::NotDispatched => "not dispatched".to_string(),
            Self::Aggregate { children } => {
                format!(
                    "aggregate({} ok / {} total)",
                    children.iter().filter(|c| c.is_success()).count(),
                    children.len()
                )
            }
            Self::Typed { type_name, .. } => format!("typed<{type_name}>"),
        }
    }

    /// Short tag used as the wire `dispatch-result-type` discriminant.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure { .. } => "failure",
            Self::ValidationFailure { .. } => "validation-failure",
            Self::ConcurrencyIssue => "concurrency-issue",
            Self::NotAuthorized => "not-authorized",
            Self::NotAuthenticated => "not-authenticated",
            Self::EntityNotFound => "entity-not-found",
            Self::NotDispatched => "not-dispatched",
            Self::Aggregate { .. } => "aggregate",
            Self::Typed { .. } => "typed",
        }
    }
}

impl fmt::Debug for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DispatchResult::{}({})", self.wire_tag(), self.message())
    }
}

#[cfg(test)]
#[path = "dispatch_result_tests.rs"]
mod tests;
