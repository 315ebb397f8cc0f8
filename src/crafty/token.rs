// src/crafty/token.rs
use std::fmt;
use std::time::{Duration, Instant};

/// Where the client gets its bearer token from.
#[derive(Clone)]
pub enum Credentials {
    /// A long-lived API token issued by the manager. Never refreshed.
    Token(String),
    /// Username and password exchanged for a session token on login.
    Login { username: String, password: String },
}

impl Credentials {
    pub fn can_refresh(&self) -> bool {
        matches!(self, Self::Login { .. })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f
                .debug_tuple("Token")
                .field(&if token.is_empty() { "<empty>" } else { "<redacted>" })
                .finish(),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// A bearer token together with the instant it stops being trusted locally.
///
/// `expires_at == None` marks a static token that never expires on our side.
#[derive(Clone, Default)]
pub struct SessionToken {
    value: String,
    expires_at: Option<Instant>,
}

impl SessionToken {
    pub fn from_static(value: String) -> Self {
        Self { value, expires_at: None }
    }

    pub fn issued(value: String, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Some(now + ttl),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// A token is valid iff it is non-empty and `now` is before its expiry.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        if self.value.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expiry) => now < expiry,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    pub fn invalidate(&mut self) {
        self.value.clear();
        self.expires_at = None;
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("present", &!self.value.is_empty())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
