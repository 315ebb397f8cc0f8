use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use log::warn;

use crate::crafty::token::Credentials;

pub const DEFAULT_API_URL: &str = "https://localhost:8443/api/v2";
pub const DEFAULT_BROADCAST_PORT: u16 = 4445;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Settings for talking to the Crafty manager API.
#[derive(Clone, Debug)]
pub struct CraftyConfig {
    pub api_url: String,
    pub credentials: Credentials,
    pub token_ttl: Duration,
    pub http_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub crafty: CraftyConfig,

    // LAN broadcast
    pub broadcast_ip: IpAddr,
    pub broadcast_port: u16,
    pub broadcast_timeout: Duration,

    // Poll loop
    pub check_interval: Duration,

    // Dashboard
    pub web_host: String,
    pub web_port: u16,
    pub heartbeat_log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crafty: CraftyConfig {
                api_url: DEFAULT_API_URL.to_string(),
                credentials: Credentials::Token(String::new()),
                token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
                http_timeout: Duration::from_secs(10),
            },
            broadcast_ip: IpAddr::V4(Ipv4Addr::BROADCAST),
            broadcast_port: DEFAULT_BROADCAST_PORT,
            broadcast_timeout: Duration::from_millis(2000),
            check_interval: Duration::from_secs(30),
            web_host: "0.0.0.0".to_string(),
            web_port: 8080,
            heartbeat_log_capacity: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to
    /// defaults for missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CRAFTY_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.crafty.api_url);

        let credentials = credentials_from(&lookup);

        let token_ttl_secs = parse_or(&lookup, "CRAFTY_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS);
        let http_timeout_secs = parse_or(&lookup, "CRAFTY_HTTP_TIMEOUT_SECS", 10u64).max(1);
        let broadcast_timeout_ms = parse_or(&lookup, "BROADCAST_TIMEOUT_MS", 2000u64).max(1);
        let check_interval_secs = parse_or(&lookup, "CHECK_INTERVAL", 30u64).max(1);

        Self {
            crafty: CraftyConfig {
                api_url,
                credentials,
                token_ttl: Duration::from_secs(token_ttl_secs),
                http_timeout: Duration::from_secs(http_timeout_secs),
            },
            broadcast_ip: parse_or(&lookup, "BROADCAST_IP", defaults.broadcast_ip),
            broadcast_port: parse_or(&lookup, "MINECRAFT_BROADCAST_PORT", defaults.broadcast_port),
            broadcast_timeout: Duration::from_millis(broadcast_timeout_ms),
            check_interval: Duration::from_secs(check_interval_secs),
            web_host: lookup("WEB_SERVER_HOST").unwrap_or(defaults.web_host),
            web_port: parse_or(&lookup, "WEB_SERVER_PORT", defaults.web_port),
            heartbeat_log_capacity: parse_or(&lookup, "HEARTBEAT_LOG_CAPACITY", defaults.heartbeat_log_capacity)
                .max(1),
        }
    }

    pub fn broadcast_target(&self) -> SocketAddr {
        SocketAddr::new(self.broadcast_ip, self.broadcast_port)
    }

    pub fn web_bind(&self) -> String {
        format!("{}:{}", self.web_host, self.web_port)
    }
}

fn credentials_from<F>(lookup: &F) -> Credentials
where
    F: Fn(&str) -> Option<String>,
{
    let username = lookup("CRAFTY_USERNAME").filter(|v| !v.is_empty());
    let password = lookup("CRAFTY_PASSWORD");
    let token = lookup("CRAFTY_API_TOKEN").unwrap_or_default();

    match (username, password) {
        (Some(username), Some(password)) => {
            if !token.is_empty() {
                warn!("Both CRAFTY_API_TOKEN and CRAFTY_USERNAME/CRAFTY_PASSWORD are set; using username/password");
            }
            Credentials::Login { username, password }
        }
        _ => {
            if token.is_empty() {
                warn!("No Crafty credentials configured! Authentication will fail.");
            }
            Credentials::Token(token)
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}
