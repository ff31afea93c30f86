use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::error::TransportError;

/// Largest datagram a single-packet A2S reply can occupy.
const MAX_DATAGRAM: usize = 1400;

/// Datagram exchange capability: send one request, wait for one reply.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn exchange(
        &self,
        target: SocketAddr,
        request: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Tokio UDP transport, one ephemeral socket per exchange.
#[derive(Debug, Clone, Default)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn exchange(
        &self,
        target: SocketAddr,
        request: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        // connected socket so ICMP port-unreachable surfaces as ConnectionRefused
        socket.connect(target).await?;
        socket.send(request).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM];
        let len = tokio::time::timeout(timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout)??;
        buf.truncate(len);
        Ok(buf)
    }
}
