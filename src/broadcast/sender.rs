// src/broadcast/sender.rs
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use log::{debug, info};
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::broadcast::packet::encode_announcement;
use crate::broadcast::BroadcastError;

/// Sends one-shot LAN discovery datagrams to a fixed broadcast target.
#[derive(Debug, Clone)]
pub struct LanBroadcaster {
    target: SocketAddr,
    send_timeout: Duration,
}

impl LanBroadcaster {
    pub fn new(target: SocketAddr, send_timeout: Duration) -> Self {
        info!("Initialized LAN broadcaster for {}", target);
        Self { target, send_timeout }
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Announces `port` with `motd`. `server_name` is only used for logging.
    pub async fn broadcast(&self, server_name: &str, motd: &str, port: u16) -> Result<(), BroadcastError> {
        let sent = self.send(motd, port).await?;
        info!(
            "Broadcasted server {} on port {} with MOTD: {} ({} bytes)",
            server_name, port, motd, sent
        );
        Ok(())
    }

    async fn send(&self, motd: &str, port: u16) -> Result<usize, BroadcastError> {
        let datagram = encode_announcement(motd, port)?;
        let socket = open_broadcast_socket(self.target)?;

        let sent = tokio::time::timeout(self.send_timeout, socket.send_to(&datagram, self.target))
            .await
            .map_err(|_| BroadcastError::Timeout(self.send_timeout))??;
        debug!("Sent {} of {} bytes to {}", sent, datagram.len(), self.target);
        Ok(sent)
    }
}

fn open_broadcast_socket(target: SocketAddr) -> Result<UdpSocket, BroadcastError> {
    let socket = Socket::new(Domain::for_address(target), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_broadcast(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;

    let local: SocketAddr = if target.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    socket.bind(&local.into())?;

    Ok(UdpSocket::from_std(socket.into())?)
}
