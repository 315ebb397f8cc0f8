// src/utils.rs
use chrono::Local;

/// Format used for heartbeat timestamps shown on the dashboard.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Joins the manager base URL and an endpoint path with exactly one slash.
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint.trim_start_matches('/'))
}
