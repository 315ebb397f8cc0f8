// src/reconciler.rs
use std::any::Any;
use std::future::Future;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use futures_util::FutureExt;
use log::{error, info, warn};
use thiserror::Error;
use tokio::sync::watch;

use crate::broadcast::{generate_motd, LanBroadcaster};
use crate::crafty::{ApiError, CraftyClient};
use crate::models::heartbeat::{ActiveServer, CycleSummary, HeartbeatLevel};
use crate::storage::memory::HeartbeatSink;

pub const NO_SERVERS_MESSAGE: &str = "No servers found or could not connect to Crafty Controller";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("initial login to Crafty failed: {0}")]
    InitialLogin(#[source] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    NoServers,
    Completed(CycleSummary),
}

/// Polls the manager on a fixed interval and announces every running server
/// on the LAN. Servers are handled one after another within a cycle.
pub struct Reconciler {
    client: CraftyClient,
    broadcaster: LanBroadcaster,
    heartbeats: Arc<dyn HeartbeatSink>,
    interval: Duration,
}

impl Reconciler {
    pub fn new(
        client: CraftyClient,
        broadcaster: LanBroadcaster,
        heartbeats: Arc<dyn HeartbeatSink>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            broadcaster,
            heartbeats,
            interval,
        }
    }

    /// Logs in, then reconciles until `shutdown` flips to `true` (or its
    /// sender goes away). Shutdown is only observed between cycles.
    ///
    /// A failed initial login is the only error; nothing after it stops the loop.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), ReconcileError> {
        info!("Starting Minecraft server broadcaster, check interval {:?}", self.interval);

        if let Err(e) = self.client.login().await {
            error!("Initial login failed: {}", e);
            self.heartbeats
                .record(HeartbeatLevel::Error, format!("Initial login failed: {}", e).into());
            return Err(ReconcileError::InitialLogin(e));
        }
        self.heartbeats.set_running(true);

        loop {
            if let Err(panic) = AssertUnwindSafe(self.reconcile_once()).catch_unwind().await {
                let reason = panic_message(panic.as_ref());
                error!("Error in main loop: {}", reason);
                self.heartbeats
                    .record(HeartbeatLevel::Error, format!("Error in main loop: {}", reason).into());
            }

            let stop = tokio::select! {
                _ = tokio::time::sleep(self.interval) => false,
                changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
            };
            if stop {
                break;
            }
        }

        self.heartbeats.set_running(false);
        info!("Broadcaster stopped");
        Ok(())
    }

    /// One poll: list servers, broadcast the running ones, record a heartbeat.
    pub async fn reconcile_once(&mut self) -> CycleOutcome {
        let servers = self.client.get_servers().await;
        if servers.is_empty() {
            warn!("{}", NO_SERVERS_MESSAGE);
            self.heartbeats.record(HeartbeatLevel::Warning, NO_SERVERS_MESSAGE.into());
            return CycleOutcome::NoServers;
        }

        let mut active_servers = Vec::new();
        for server in &servers {
            let Some(id) = server.server_id.as_ref() else {
                warn!("Server missing ID: {:?}", server);
                continue;
            };

            if !self.client.is_server_running(id).await {
                info!(
                    "Server {} is not active",
                    server.server_name.as_deref().unwrap_or(id.as_str())
                );
                continue;
            }

            let Some(info) = self.client.get_server_info(id).await else {
                warn!("Could not get info for server {}", id);
                continue;
            };

            info!("Server {} ({}) is active on port {}", info.name, id, info.port);
            let motd = generate_motd(&info.name, &info.description);
            if let Err(e) = self.broadcaster.broadcast(&info.name, &motd, info.port).await {
                error!(
                    "Error broadcasting server {} ({}) to {}: {}",
                    info.name,
                    id,
                    self.broadcaster.target(),
                    e
                );
            }
            active_servers.push(ActiveServer::from(&info));
        }

        let summary = CycleSummary {
            total_servers: servers.len(),
            total_active: active_servers.len(),
            active_servers,
        };
        info!(
            "Cycle complete: {} of {} servers active",
            summary.total_active, summary.total_servers
        );
        self.heartbeats.record(HeartbeatLevel::Info, summary.clone().into());
        CycleOutcome::Completed(summary)
    }
}

/// Flips `shutdown` once `signal` resolves. When the signal cannot be
/// listened for, the sender is held for good so the loop keeps running.
pub async fn forward_shutdown<F>(signal: F, shutdown: watch::Sender<bool>)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown requested, stopping after the current cycle");
            let _ = shutdown.send(true);
        }
        Err(e) => {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
