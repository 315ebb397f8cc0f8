// src/broadcast/mod.rs
pub mod motd;
pub mod packet;
pub mod sender;

use std::time::Duration;
use thiserror::Error;

pub use motd::generate_motd;
pub use sender::LanBroadcaster;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("cannot encode announcement: {0}")]
    Encoding(String),

    #[error("malformed announcement: {0}")]
    Decode(String),

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}
