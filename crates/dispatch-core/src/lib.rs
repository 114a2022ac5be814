// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dispatch-core: value types and the wire-independent data model shared by
//! every other crate in the dispatch workspace.

pub mod address;
pub mod clock;
pub mod dispatch_data;
pub mod dispatch_result;
pub mod error;
pub mod handler;
pub mod id;
pub mod module;
pub mod processor;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use address::EndPointAddress;
pub use clock::{Clock, FakeClock, SystemClock};
pub use dispatch_data::DispatchData;
pub use dispatch_result::DispatchResult;
pub use error::CoreError;
pub use handler::{
    ConfigKey, ConfigValue, HandlerRegistration, MessageHandlerActionDescriptor,
    MessageHandlerConfiguration,
};
pub use id::IdBuf;
pub use module::{
    ModuleIdentifier, ModuleReleaseIdentifier, ModuleVersion, ModuleVersionRange,
    ResolvedInstallationSet, UnresolvedInstallationSet,
};
pub use processor::MessageProcessorRegistration;
pub use session::{CoordinationEntryPath, CoordinationSession, StoredSession};
