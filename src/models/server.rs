// src/models/server.rs
use std::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SERVER_NAME: &str = "Unknown Server";
pub const DEFAULT_SERVER_PORT: u16 = 25565;
pub const DEFAULT_DESCRIPTION: &str = "A Minecraft Server";
pub const DEFAULT_VERSION: &str = "Unknown";
pub const DEFAULT_MAX_PLAYERS: u32 = 20;

/// The `{"status": "ok", "data": ...}` wrapper every manager response uses.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Manager-side server identifier. Crafty has used both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ServerId(n.to_string()),
            RawId::Text(s) => ServerId(s),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

/// One entry of `GET /servers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSummary {
    #[serde(default)]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub server_name: Option<String>,
}

/// The nested `server_id` object inside a stats response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsServerRef {
    #[serde(default)]
    pub server_name: Option<String>,
}

/// `GET /servers/{id}/stats`. Every field is optional on the wire and Crafty
/// sends `false` for values its ping could not read, so off-type values are
/// dropped to `None` here; the accessors below apply the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerStats {
    #[serde(default, deserialize_with = "lenient")]
    pub running: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub server_id: Option<StatsServerRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub server_port: Option<u16>,
    #[serde(default, deserialize_with = "lenient")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub max: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub online: Option<u32>,
}

/// Reads any JSON value and keeps it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl ServerStats {
    pub fn is_running(&self) -> bool {
        self.running.unwrap_or(false)
    }

    pub fn name(&self) -> String {
        self.server_id
            .as_ref()
            .and_then(|s| s.server_name.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string())
    }

    pub fn port(&self) -> u16 {
        self.server_port.unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn description(&self) -> String {
        self.desc.clone().unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
    }

    pub fn version(&self) -> String {
        self.version.clone().unwrap_or_else(|| DEFAULT_VERSION.to_string())
    }

    pub fn into_info(self, id: ServerId) -> ServerInfo {
        ServerInfo {
            name: self.name(),
            port: self.port(),
            description: self.description(),
            version: self.version(),
            max_players: self.max.unwrap_or(DEFAULT_MAX_PLAYERS),
            online_players: self.online.unwrap_or(0),
            running: self.is_running(),
            id,
        }
    }
}

/// Normalized view of a managed server, built fresh on every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerInfo {
    pub id: ServerId,
    pub name: String,
    pub port: u16,
    pub description: String,
    pub version: String,
    pub max_players: u32,
    pub online_players: u32,
    pub running: bool,
}
