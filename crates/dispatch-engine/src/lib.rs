// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dispatch-engine: handler registration, the processor pipeline, and the
//! local dispatcher that ties them together.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler_registry;
pub mod pipeline;

pub use context::DispatchContext;
pub use dispatcher::LocalDispatcher;
pub use error::EngineError;
pub use handler_registry::{HandlerRegistry, MessageHandler};
pub use pipeline::{Next, Processor, ProcessorPipeline};
