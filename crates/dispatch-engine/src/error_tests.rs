// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

use super::*;
use dispatch_core::processor::ProcessorName;

#[test]
fn processor_cycle_message_names_the_stuck_processor() {
    let err = EngineError::ProcessorCycle { processor: ProcessorName::new("auth") };
    assert!(err.to_string().contains("auth"));
}
