// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Dispatch Authors

//! `dispatchd`: owns this node's coordination session, routes end-point
//! traffic, and supervises the module releases configured for this host.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use dispatch_adapters::TcpTransport;
use dispatch_core::handler::MessageHandlerConfiguration;
use dispatch_core::{DispatchData, DispatchResult, SystemClock};
use dispatch_daemon::events::InstallationSetChanged;
use dispatch_daemon::installation_manager::ModuleInstallationManager;
use dispatch_daemon::path_map::PathMap;
use dispatch_daemon::remote_dispatcher::RemoteDispatcher;
use dispatch_daemon::router::EndPointRouter;
use dispatch_daemon::server::{DispatchServer, WireHandlerRegistry};
use dispatch_daemon::session_owner::SessionOwner;
use dispatch_daemon::supervisor::{SupervisorConfig, SupervisorEvent};
use dispatch_daemon::{Config, ConfigError};
use dispatch_engine::context::DispatchContext;
use dispatch_engine::{HandlerRegistry, LocalDispatcher, MessageHandler, ProcessorPipeline};
use dispatch_store::{FileMetadataReader, InMemoryEntityStorage, InMemorySessionStorage};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dispatchd", about = "Message dispatch and routing daemon")]
struct Args {
    /// Path to a TOML config file. Falls back to built-in defaults when absent.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Server(#[from] dispatch_daemon::server::ServerError),
}

/// Forwards a resolved installation-set change to the installation manager.
struct ReconcileOnChange {
    manager: Arc<ModuleInstallationManager>,
}

#[async_trait]
impl MessageHandler<InstallationSetChanged> for ReconcileOnChange {
    async fn handle(
        &self,
        message: &InstallationSetChanged,
        _data: &DispatchData,
        _config: &MessageHandlerConfiguration,
        _ctx: &DispatchContext,
    ) -> DispatchResult {
        match self.manager.configure_installation_set(message.resolved.clone()).await {
            Ok(()) => DispatchResult::Success,
            Err(error) => DispatchResult::failure(error.to_string()),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path).map_err(StartupError::from)?,
        None => Config::default(),
    };

    init_tracing(&config.log_level);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::from)?
        .block_on(run(config))?;
    Ok(())
}

async fn run(config: Config) -> Result<(), StartupError> {
    info!(bind_addr = %config.bind_addr, "starting dispatchd");

    let sessions: Arc<dyn dispatch_store::SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let entities: Arc<dyn dispatch_store::EntityStorage> = Arc::new(InMemoryEntityStorage::new());

    let session_owner =
        SessionOwner::start(Arc::clone(&sessions), config.bind_addr.clone(), config.lease_length_ms());
    let session = session_owner.session().await;
    info!(session = %session, "coordination session established");

    let router =
        Arc::new(EndPointRouter::new(Arc::clone(&sessions), Arc::clone(&entities), Arc::new(TcpTransport)));
    tokio::spawn(Arc::clone(&router).run_cleanup());

    let reaper_interval = std::time::Duration::from_millis((config.lease_length_ms() / 2).max(1));
    tokio::spawn(dispatch_daemon::lease_reaper::run(Arc::clone(&sessions), SystemClock, reaper_interval));

    let registry = HandlerRegistry::new();
    let pipeline = Arc::new(ProcessorPipeline::empty());
    let local = Arc::new(LocalDispatcher::new(Arc::clone(&registry), pipeline));
    // Available to host code that registers application handlers; this
    // bootstrap only wires the ambient routing/supervision machinery.
    let _remote = RemoteDispatcher::new(Arc::clone(&local), Arc::clone(&router), config.bind_addr.clone());

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<SupervisorEvent>();
    let path_map = Arc::new(PathMap::new());
    let installation_manager = Arc::new(ModuleInstallationManager::new(
        Arc::new(FileMetadataReader),
        config.install_root.clone(),
        config.modules_dir.clone(),
        SupervisorConfig::default(),
        events_tx,
        Arc::clone(&path_map),
    ));

    // Startup adoption needs a previously-resolved installation set to
    // compare existing install directories against; without a persisted
    // manifest to read one from, this binary starts with nothing running
    // and waits for an `InstallationSetChanged` dispatch to populate it.
    registry.register::<InstallationSetChanged, _>(
        ReconcileOnChange { manager: Arc::clone(&installation_manager) },
        MessageHandlerConfiguration::default(),
    );

    tokio::spawn({
        let local = Arc::clone(&local);
        async move {
            while let Some(event) = events_rx.recv().await {
                match event {
                    SupervisorEvent::Started(started) => {
                        local.dispatch(DispatchData::from_message(started), true).await;
                    }
                    SupervisorEvent::Terminated(terminated) => {
                        local.dispatch(DispatchData::from_message(terminated), true).await;
                    }
                }
            }
        }
    });

    let wire_handlers = Arc::new(WireHandlerRegistry::new());
    let server = DispatchServer::bind(&config.bind_addr, Arc::clone(&local), wire_handlers).await?;
    let server_task = tokio::spawn(server.run());

    tokio::signal::ctrl_c().await.map_err(StartupError::from)?;
    info!("shutdown signal received, disposing session");
    server_task.abort();
    session_owner.dispose().await;

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
