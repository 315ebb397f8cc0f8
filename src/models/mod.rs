pub mod heartbeat;
pub mod server;
