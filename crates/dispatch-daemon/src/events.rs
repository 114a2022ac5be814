// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! Module-to-host events, dispatched through the messaging layer like any
//! other message rather than delivered out of band.

use dispatch_core::module::ModuleReleaseIdentifier;
use dispatch_core::ResolvedInstallationSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStartedEvent {
    pub release: ModuleReleaseIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTerminatedEvent {
    pub release: ModuleReleaseIdentifier,
}

#[derive(Debug, Clone)]
pub struct InstallationSetChanged {
    pub resolved: ResolvedInstallationSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationSetConflict {
    pub requested: Vec<dispatch_core::module::ModuleIdentifier>,
}
