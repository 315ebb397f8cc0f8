// src/crafty/mod.rs
pub mod client;
pub mod error;
pub mod token;

pub use client::CraftyClient;
pub use error::ApiError;
pub use token::Credentials;
