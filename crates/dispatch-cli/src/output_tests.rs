// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;

#[test]
fn success_exits_zero() {
    assert_eq!(print_result(OutputFormat::Text, &WireDispatchResult::Success), 0);
}

#[test]
fn typed_exits_zero() {
    let result = WireDispatchResult::Typed { type_name: "u32".to_string(), value: serde_json::json!(1) };
    assert_eq!(print_result(OutputFormat::Json, &result), 0);
}

#[test]
fn failure_exits_one() {
    let result = WireDispatchResult::Failure { message: "boom".to_string() };
    assert_eq!(print_result(OutputFormat::Text, &result), 1);
}

#[test]
fn aggregate_with_any_failure_exits_one() {
    let result = WireDispatchResult::Aggregate {
        children: vec![WireDispatchResult::Success, WireDispatchResult::Failure { message: "boom".to_string() }],
    };
    assert_eq!(print_result(OutputFormat::Text, &result), 1);
}

#[test]
fn aggregate_all_success_exits_zero() {
    let result = WireDispatchResult::Aggregate {
        children: vec![WireDispatchResult::Success, WireDispatchResult::Success],
    };
    assert_eq!(print_result(OutputFormat::Text, &result), 0);
}
