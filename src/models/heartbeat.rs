// src/models/heartbeat.rs
use serde::Serialize;

use crate::models::server::{ServerId, ServerInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartbeatLevel {
    Info,
    Warning,
    Error,
}

/// A server that was broadcast during a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveServer {
    pub id: ServerId,
    pub name: String,
    pub port: u16,
    pub description: String,
    pub version: String,
    /// `online/max`, e.g. `3/20`.
    pub players: String,
}

impl From<&ServerInfo> for ActiveServer {
    fn from(info: &ServerInfo) -> Self {
        Self {
            id: info.id.clone(),
            name: info.name.clone(),
            port: info.port,
            description: info.description.clone(),
            version: info.version.clone(),
            players: format!("{}/{}", info.online_players, info.max_players),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    pub active_servers: Vec<ActiveServer>,
    pub total_servers: usize,
    pub total_active: usize,
}

/// Payload of a heartbeat: either a free-text note or a cycle summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeartbeatData {
    Message(String),
    Summary(CycleSummary),
}

impl From<&str> for HeartbeatData {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for HeartbeatData {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<CycleSummary> for HeartbeatData {
    fn from(summary: CycleSummary) -> Self {
        Self::Summary(summary)
    }
}

/// Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartbeatEntry {
    pub timestamp: String,
    pub level: HeartbeatLevel,
    pub data: HeartbeatData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_serializes_as_plain_string() {
        let entry = HeartbeatEntry {
            timestamp: "2024-01-01 00:00:00".into(),
            level: HeartbeatLevel::Warning,
            data: "No servers found".into(),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"timestamp": "2024-01-01 00:00:00", "level": "warning", "data": "No servers found"})
        );
    }

    #[test]
    fn summary_serializes_as_object() {
        let info = ServerInfo {
            id: ServerId::new("1"),
            name: "Survival".into(),
            port: 25565,
            description: "A Minecraft Server".into(),
            version: "1.20.1".into(),
            max_players: 20,
            online_players: 4,
            running: true,
        };
        let data: HeartbeatData = CycleSummary {
            active_servers: vec![ActiveServer::from(&info)],
            total_servers: 2,
            total_active: 1,
        }
        .into();
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({
                "active_servers": [{
                    "id": "1",
                    "name": "Survival",
                    "port": 25565,
                    "description": "A Minecraft Server",
                    "version": "1.20.1",
                    "players": "4/20"
                }],
                "total_servers": 2,
                "total_active": 1
            })
        );
    }
}
