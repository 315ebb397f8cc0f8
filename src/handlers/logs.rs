// src/handlers/logs.rs
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::heartbeat::HeartbeatEntry;
use crate::storage::memory::HeartbeatLog;

const DEFAULT_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct LogsQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct LogsResponse {
    logs: Vec<HeartbeatEntry>,
    total: usize,
}

/// `GET /api/logs?limit=N`: the most recent heartbeats, oldest first.
pub async fn get_logs(log: web::Data<HeartbeatLog>, query: web::Query<LogsQuery>) -> HttpResponse {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let logs = log.recent(limit);
    HttpResponse::Ok().json(LogsResponse {
        logs,
        total: log.len(),
    })
}
