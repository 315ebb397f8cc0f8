// src/crafty/error.rs
use reqwest::{Method, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not build HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("{endpoint} still unauthorized after re-authenticating")]
    Unauthorized { endpoint: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("unexpected response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),
}

impl ApiError {
    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}
