// src/crafty/client.rs
use std::time::{Duration, Instant};
use log::{debug, error, info, warn};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::CraftyConfig;
use crate::crafty::error::ApiError;
use crate::crafty::token::{Credentials, SessionToken};
use crate::models::server::{Envelope, LoginData, ServerId, ServerInfo, ServerStats, ServerSummary};
use crate::utils::join_url;

pub const LOGIN_ENDPOINT: &str = "auth/login";
pub const SERVERS_ENDPOINT: &str = "servers";

pub fn stats_endpoint(id: &ServerId) -> String {
    format!("servers/{}/stats", id)
}

/// Authenticated client for the Crafty Controller API.
///
/// The client logs itself in on demand: every request first makes sure a
/// valid session token exists, and a 401 on a session token causes exactly
/// one re-login and retry. It is driven by a single task, so the token needs
/// no locking.
pub struct CraftyClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    token: SessionToken,
    token_ttl: Duration,
}

impl CraftyClient {
    pub fn new(config: &CraftyConfig) -> Result<Self, ApiError> {
        // Crafty serves a self-signed certificate on the LAN. The manager is
        // trusted by network position, so certificate validation is off.
        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .connect_timeout(config.http_timeout)
            .timeout(config.http_timeout)
            .build()
            .map_err(ApiError::ClientSetup)?;

        let token = match &config.credentials {
            Credentials::Token(token) => SessionToken::from_static(token.clone()),
            Credentials::Login { .. } => SessionToken::default(),
        };

        info!("Initialized Crafty API client for: {}", config.api_url);

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            credentials: config.credentials.clone(),
            token,
            token_ttl: config.token_ttl,
        })
    }

    pub fn has_valid_token(&self) -> bool {
        self.token.is_valid()
    }

    /// Makes sure a valid token is held, logging in only when needed.
    pub async fn login(&mut self) -> Result<(), ApiError> {
        if self.token.is_valid() {
            return Ok(());
        }
        self.token.invalidate();

        let (username, password) = match &self.credentials {
            Credentials::Login { username, password } => (username, password),
            Credentials::Token(_) => {
                return Err(ApiError::Auth("static API token is empty".to_string()));
            }
        };

        let url = join_url(&self.base_url, LOGIN_ENDPOINT);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: LOGIN_ENDPOINT.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Auth(format!("login as {} returned HTTP {}", username, status)));
        }

        let data: LoginData = read_envelope(LOGIN_ENDPOINT, response).await?;
        if data.token.is_empty() {
            return Err(ApiError::malformed(LOGIN_ENDPOINT, "empty token"));
        }

        self.token = SessionToken::issued(data.token, Instant::now(), self.token_ttl);
        info!("Logged in to Crafty as {}", username);
        Ok(())
    }

    /// Performs an authenticated call and returns the envelope's `data`.
    ///
    /// Only GET and POST are supported; `body` is sent for POST only.
    pub async fn request<T: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        if method != Method::GET && method != Method::POST {
            error!("Unsupported HTTP method {} for {}", method, endpoint);
            return Err(ApiError::UnsupportedMethod(method));
        }

        let url = join_url(&self.base_url, endpoint);
        let mut retried = false;

        loop {
            self.login().await?;

            let mut builder = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(self.token.value());
            if method == Method::POST {
                if let Some(body) = body {
                    builder = builder.json(body);
                }
            }

            debug!("{} {}", method, url);
            let response = builder.send().await.map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                if !self.credentials.can_refresh() {
                    return Err(ApiError::Unauthorized { endpoint: endpoint.to_string() });
                }
                self.token.invalidate();
                if retried {
                    return Err(ApiError::Unauthorized { endpoint: endpoint.to_string() });
                }
                warn!("{} returned 401, logging in again and retrying once", endpoint);
                retried = true;
                continue;
            }
            if !status.is_success() {
                return Err(ApiError::Status {
                    endpoint: endpoint.to_string(),
                    status,
                });
            }

            return read_envelope(endpoint, response).await;
        }
    }

    /// Lists managed servers. Any failure is logged and yields an empty list.
    pub async fn get_servers(&mut self) -> Vec<ServerSummary> {
        match self.request(SERVERS_ENDPOINT, Method::GET, None).await {
            Ok(servers) => servers,
            Err(e) => {
                error!("Error fetching server list: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_server_stats(&mut self, id: &ServerId) -> Option<ServerStats> {
        match self.request(&stats_endpoint(id), Method::GET, None).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                error!("Error fetching stats for server {}: {}", id, e);
                None
            }
        }
    }

    /// `false` whenever stats are unavailable, so an unreachable server is
    /// never announced.
    pub async fn is_server_running(&mut self, id: &ServerId) -> bool {
        self.get_server_stats(id)
            .await
            .map(|stats| stats.is_running())
            .unwrap_or(false)
    }

    pub async fn get_server_info(&mut self, id: &ServerId) -> Option<ServerInfo> {
        self.get_server_stats(id)
            .await
            .map(|stats| stats.into_info(id.clone()))
    }
}

async fn read_envelope<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
    let envelope: Envelope = response
        .json()
        .await
        .map_err(|e| ApiError::malformed(endpoint, format!("invalid JSON: {}", e)))?;

    match (envelope.status.as_deref(), envelope.data) {
        (Some("ok"), Some(data)) => {
            serde_json::from_value(data).map_err(|e| ApiError::malformed(endpoint, e.to_string()))
        }
        (status, _) => Err(ApiError::malformed(
            endpoint,
            format!("expected status \"ok\" with data, got status {:?}", status),
        )),
    }
}
