// src/main.rs
use std::sync::Arc;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use tokio::sync::watch;

use mc_lan_beacon::broadcast::LanBroadcaster;
use mc_lan_beacon::config::Config;
use mc_lan_beacon::crafty::CraftyClient;
use mc_lan_beacon::handlers;
use mc_lan_beacon::reconciler::{forward_shutdown, Reconciler};
use mc_lan_beacon::storage::memory::{HeartbeatLog, HeartbeatSink};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let heartbeats = Arc::new(HeartbeatLog::new(config.heartbeat_log_capacity));

    let client = CraftyClient::new(&config.crafty).map_err(|e| {
        error!("Failed to create Crafty client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let broadcaster = LanBroadcaster::new(config.broadcast_target(), config.broadcast_timeout);
    let reconciler = Reconciler::new(client, broadcaster, heartbeats.clone(), config.check_interval);

    let bind = config.web_bind();
    let log_data = web::Data::from(heartbeats.clone());

    info!("Starting dashboard on http://{}", bind);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(log_data.clone())
            .configure(handlers::configure)
    })
    .workers(2)
    .disable_signals()
    .bind(&bind)?
    .run();
    let server_handle = server.handle();
    actix_web::rt::spawn(server);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    actix_web::rt::spawn(forward_shutdown(tokio::signal::ctrl_c(), shutdown_tx));

    let outcome = reconciler.run(shutdown_rx).await;

    heartbeats.set_running(false);
    server_handle.stop(true).await;

    outcome.map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })
}
