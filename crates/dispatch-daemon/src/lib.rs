// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The `dispatchd` process: owns a coordination session, routes end-point
//! traffic to the right node, and supervises the module releases resolved
//! for this host.

pub mod config;
pub mod events;
pub mod installation_manager;
pub mod lease_reaper;
pub mod path_map;
pub mod remote_dispatcher;
pub mod router;
pub mod server;
pub mod session_owner;
pub mod supervisor;
pub mod template;

pub use config::{Config, ConfigError};
pub use installation_manager::{InstallError, ModuleInstallationManager};
pub use path_map::PathMap;
pub use remote_dispatcher::RemoteDispatcher;
pub use router::{EndPointRouter, RouterError};
pub use session_owner::SessionOwner;
pub use supervisor::{ModuleSupervisor, SupervisorConfig, SupervisorEvent, SupervisorState};
