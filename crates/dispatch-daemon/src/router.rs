// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! End-point Router: maps an end-point address to the physical addresses of
//! its live sessions and delivers messages to one (or all) of them.
//!
//! Route entries live in two places: [`EntityStorage`] holds the actual
//! `/routes/<endPoint>/<sessionId>` → physical-address mapping, while
//! [`SessionStorage`]'s per-session entry set is used only for session-scoped
//! cleanup bookkeeping (it has no value slot of its own).

use std::sync::Arc;

use dispatch_adapters::{AdaptersError, PhysicalTransport};
use dispatch_core::session::{CoordinationEntryPath, CoordinationSession};
use dispatch_store::{EntityStorage, SessionStorage, StoreError};
use dispatch_wire::{WireDispatchResult, WireEnvelope};
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("no live route registered for end-point {end_point}")]
    NoRoute { end_point: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] AdaptersError),
}

fn route_path(end_point: &str, session: &CoordinationSession) -> String {
    format!("/routes/{end_point}/{}", session.id())
}

fn route_prefix(end_point: &str) -> String {
    format!("/routes/{end_point}/")
}

fn type_default_prefix(message_type: &str) -> String {
    format!("/types/{message_type}/")
}

fn type_default_path(message_type: &str, end_point: &str) -> String {
    format!("/types/{message_type}/{end_point}")
}

pub struct EndPointRouter {
    sessions: Arc<dyn SessionStorage>,
    entities: Arc<dyn EntityStorage>,
    transport: Arc<dyn PhysicalTransport>,
}

impl EndPointRouter {
    pub fn new(
        sessions: Arc<dyn SessionStorage>,
        entities: Arc<dyn EntityStorage>,
        transport: Arc<dyn PhysicalTransport>,
    ) -> Self {
        Self { sessions, entities, transport }
    }

    /// Advertise that `session` serves `end_point` at `physical_address`.
    pub async fn register(
        &self,
        end_point: &str,
        physical_address: &str,
        session: &CoordinationSession,
    ) -> Result<(), RouterError> {
        let key = route_path(end_point, session);
        match self.entities.put(&key, serde_json::json!(physical_address), None).await {
            Ok(_) | Err(StoreError::ConcurrencyConflict { .. }) => {}
            Err(other) => return Err(other.into()),
        }
        self.add_session_entry(session, CoordinationEntryPath::parse(&key)).await
    }

    /// Withdraw `session`'s advertisement for `end_point`.
    pub async fn unregister(
        &self,
        end_point: &str,
        session: &CoordinationSession,
    ) -> Result<(), RouterError> {
        let key = route_path(end_point, session);
        self.delete_route_entity(&key).await?;
        self.remove_session_entry(session, &CoordinationEntryPath::parse(&key)).await
    }

    /// Record `end_point` as the default route for `message_type`, used by
    /// the remote dispatcher when a caller doesn't name an explicit target.
    /// Marker entry, no payload beyond its own existence.
    pub async fn register_type_default(
        &self,
        message_type: &str,
        end_point: &str,
    ) -> Result<(), RouterError> {
        let key = type_default_path(message_type, end_point);
        match self.entities.put(&key, serde_json::Value::Bool(true), None).await {
            Ok(_) | Err(StoreError::ConcurrencyConflict { .. }) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }

    /// The first registered default end-point for `message_type`, if any.
    pub async fn resolve_type_default(&self, message_type: &str) -> Result<Option<String>, RouterError> {
        let prefix = type_default_prefix(message_type);
        let keys = self.entities.list_prefix(&prefix).await?;
        Ok(keys.first().map(|key| key[prefix.len()..].to_string()))
    }

    /// Live physical addresses for `end_point`, in lexicographic order by
    /// session id.
    pub async fn resolve(&self, end_point: &str) -> Result<Vec<String>, RouterError> {
        let keys = self.entities.list_prefix(&route_prefix(end_point)).await?;
        let mut addresses = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some((value, _)) = self.entities.get(&key).await? {
                if let Some(address) = value.as_str() {
                    addresses.push(address.to_string());
                }
            }
        }
        Ok(addresses)
    }

    /// Deliver `request` to one live address for `end_point`, chosen
    /// pseudo-randomly, retrying the next candidate on transport failure.
    pub async fn send(
        &self,
        end_point: &str,
        request: &WireEnvelope,
    ) -> Result<WireDispatchResult, RouterError> {
        let mut addresses = self.resolve(end_point).await?;
        if addresses.is_empty() {
            return Err(RouterError::NoRoute { end_point: end_point.to_string() });
        }
        addresses.shuffle(&mut rand::thread_rng());

        let mut last_error = None;
        for address in &addresses {
            match self.transport.send(address, request).await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    warn!(%address, %error, "delivery failed, trying next live address");
                    last_error = Some(error);
                }
            }
        }
        Err(last_error.expect("addresses non-empty implies at least one attempt").into())
    }

    /// Deliver `request` to every live address for `end_point` concurrently,
    /// aggregating the results (transport failures become `Failure`
    /// children rather than aborting the whole broadcast).
    pub async fn broadcast(
        &self,
        end_point: &str,
        request: &WireEnvelope,
    ) -> Result<WireDispatchResult, RouterError> {
        let addresses = self.resolve(end_point).await?;
        if addresses.is_empty() {
            return Err(RouterError::NoRoute { end_point: end_point.to_string() });
        }
        let sends = addresses.iter().map(|address| async move {
            match self.transport.send(address, request).await {
                Ok(result) => result,
                Err(error) => WireDispatchResult::Failure { message: error.to_string() },
            }
        });
        let children = futures::future::join_all(sends).await;
        Ok(WireDispatchResult::Aggregate { children })
    }

    /// Background task: wait for any session to terminate, then drain route
    /// entries belonging to sessions that have ended.
    pub async fn run_cleanup(self: Arc<Self>) {
        loop {
            let terminated = self.sessions.wait_for_any_termination().await;
            info!(session = %terminated.session, "session terminated, draining its routes");
            if let Err(error) = self.drain_ended_sessions().await {
                warn!(%error, "route cleanup pass failed");
            }
        }
    }

    async fn drain_ended_sessions(&self) -> Result<(), RouterError> {
        for record in self.sessions.get_sessions().await? {
            if !record.is_ended {
                continue;
            }
            for entry in record.entry_paths.clone() {
                self.delete_route_entity(&entry.to_string()).await?;
                self.remove_session_entry(&record.session, &entry).await?;
            }
        }
        Ok(())
    }

    async fn delete_route_entity(&self, key: &str) -> Result<(), RouterError> {
        if let Some((_, version)) = self.entities.get(key).await? {
            match self.entities.delete(key, version).await {
                Ok(()) | Err(StoreError::NotFound) => {}
                Err(other) => return Err(other.into()),
            }
        }
        Ok(())
    }

    /// Current `storage_version` for `session`, scanning the full session
    /// table: `SessionStorage` has no single-session lookup.
    async fn current_version(&self, session: &CoordinationSession) -> Result<Option<u64>, RouterError> {
        let version = self
            .sessions
            .get_sessions()
            .await?
            .into_iter()
            .find(|record| &record.session == session)
            .map(|record| record.storage_version);
        Ok(version)
    }

    async fn add_session_entry(
        &self,
        session: &CoordinationSession,
        entry: CoordinationEntryPath,
    ) -> Result<(), RouterError> {
        loop {
            let Some(version) = self.current_version(session).await? else { return Ok(()) };
            match self.sessions.add_entry(session, version, entry.clone()).await {
                Ok(_) => return Ok(()),
                Err(StoreError::ConcurrencyConflict { .. }) => continue,
                Err(StoreError::NotFound) => return Ok(()),
                Err(other) => return Err(other.into()),
            }
        }
    }

    async fn remove_session_entry(
        &self,
        session: &CoordinationSession,
        entry: &CoordinationEntryPath,
    ) -> Result<(), RouterError> {
        loop {
            let Some(version) = self.current_version(session).await? else { return Ok(()) };
            match self.sessions.remove_entry(session, version, entry).await {
                Ok(_) => return Ok(()),
                Err(StoreError::ConcurrencyConflict { .. }) => continue,
                Err(StoreError::NotFound) => return Ok(()),
                Err(other) => return Err(other.into()),
            }
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
