// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use clap::ValueEnum;
use dispatch_wire::WireDispatchResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a dispatch result and return the process exit code the caller
/// should use: 0 for a success-shaped result, 1 otherwise.
pub fn print_result(format: OutputFormat, result: &WireDispatchResult) -> i32 {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{json}");
            }
        }
        OutputFormat::Text => println!("{}", describe(result)),
    }

    match result {
        WireDispatchResult::Success | WireDispatchResult::Typed { .. } => 0,
        WireDispatchResult::Aggregate { children } => {
            if children.iter().all(|c| matches!(c, WireDispatchResult::Success | WireDispatchResult::Typed { .. })) {
                0
            } else {
                1
            }
        }
        _ => 1,
    }
}

fn describe(result: &WireDispatchResult) -> String {
    match result {
        WireDispatchResult::Success => "success".to_string(),
        WireDispatchResult::Failure { message } => format!("failure: {message}"),
        WireDispatchResult::ValidationFailure { issues } => {
            let joined = issues.iter().map(|i| format!("{}: {}", i.field, i.message)).collect::<Vec<_>>().join("; ");
            format!("validation failure: {joined}")
        }
        WireDispatchResult::ConcurrencyIssue => "concurrency issue".to_string(),
        WireDispatchResult::NotAuthorized => "not authorized".to_string(),
        WireDispatchResult::NotAuthenticated => "not authenticated".to_string(),
        WireDispatchResult::EntityNotFound => "entity not found".to_string(),
        WireDispatchResult::NotDispatched => "not dispatched".to_string(),
        WireDispatchResult::Aggregate { children } => {
            let ok = children.iter().filter(|c| matches!(c, WireDispatchResult::Success | WireDispatchResult::Typed { .. })).count();
            format!("aggregate({ok} ok / {} total)", children.len())
        }
        WireDispatchResult::Typed { type_name, value } => format!("typed<{type_name}>: {value}"),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
