// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Errors raised while assembling or running a dispatcher.

use dispatch_core::processor::ProcessorName;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("processor pipeline has a dependency cycle through {processor}")]
    ProcessorCycle { processor: ProcessorName },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
