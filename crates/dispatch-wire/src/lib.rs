// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wire protocol for daemon-to-daemon and CLI-to-daemon communication.
//!
//! Wire format: 4-byte big-endian length prefix, JSON payload.

pub mod dispatch_result;
pub mod envelope;
pub mod error;
pub mod frame;

pub use dispatch_result::{WireDispatchResult, WireValidationIssue};
pub use envelope::WireEnvelope;
pub use error::WireError;
pub use frame::{read_message, write_message, MAX_FRAME_BYTES};
