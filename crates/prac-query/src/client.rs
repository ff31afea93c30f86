use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::info::ServerProbeResult;
use crate::packet::{decode_info, info_request};
use crate::transport::{Transport, UdpTransport};

/// Default game/query port of a Source dedicated server.
pub const DEFAULT_QUERY_PORT: u16 = 27015;

/// A2S_INFO client over any [`Transport`].
///
/// No internal retry: each call sends one packet and waits at most `timeout` for one reply.
pub struct QueryClient<T = UdpTransport> {
    transport: Arc<T>,
}

impl<T> Clone for QueryClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl QueryClient<UdpTransport> {
    pub fn udp() -> Self {
        Self::new(UdpTransport::new())
    }
}

impl<T> QueryClient<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Probe the server; `None` means "not ready" whatever the underlying cause.
    pub async fn query(
        &self,
        address: IpAddr,
        port: u16,
        timeout: Duration,
    ) -> Option<ServerProbeResult> {
        let target = SocketAddr::new(address, port);
        trace!(%target, timeout_ms = timeout.as_millis() as u64, "sending info query");

        let datagram = match self
            .transport
            .exchange(target, &info_request(), timeout)
            .await
        {
            Ok(datagram) => datagram,
            Err(e) if e.is_not_ready() => {
                debug!(%target, reason = %e, "server not ready");
                return None;
            }
            Err(e) => {
                warn!(%target, error = %e, "info query transport failure");
                return None;
            }
        };

        match decode_info(&datagram) {
            Ok(info) => {
                trace!(%target, map = %info.map, players = info.players, "info reply decoded");
                Some(info)
            }
            Err(e) => {
                debug!(%target, error = %e, len = datagram.len(), "malformed info reply");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::net::UdpSocket;

    use super::*;
    use crate::error::TransportError;
    use crate::packet::fixture::info_response;

    /// Replays one scripted outcome and records what was sent.
    struct ScriptedTransport {
        reply: Mutex<Option<Result<Vec<u8>, TransportError>>>,
        sent: Mutex<Vec<(SocketAddr, Vec<u8>, Duration)>>,
    }

    impl ScriptedTransport {
        fn new(reply: Result<Vec<u8>, TransportError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn exchange(
            &self,
            target: SocketAddr,
            request: &[u8],
            timeout: Duration,
        ) -> Result<Vec<u8>, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((target, request.to_vec(), timeout));
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(TransportError::Timeout))
        }
    }

    const ADDR: &str = "10.1.2.3";

    #[tokio::test]
    async fn well_formed_reply_is_ready() {
        let client = QueryClient::new(ScriptedTransport::new(Ok(info_response("de_dust2", 5, true))));

        let info = client
            .query(ADDR.parse().unwrap(), 27015, Duration::from_millis(500))
            .await
            .expect("server should be ready");
        assert!(info.ready);
        assert_eq!(info.map, "de_dust2");
        assert_eq!(info.players, 5);
    }

    #[tokio::test]
    async fn sends_exactly_one_request_to_target() {
        let transport = ScriptedTransport::new(Err(TransportError::Timeout));
        let client = QueryClient::new(transport);

        assert!(
            client
                .query(ADDR.parse().unwrap(), 27016, Duration::from_millis(250))
                .await
                .is_none()
        );

        let sent = client.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "10.1.2.3:27016".parse::<SocketAddr>().unwrap());
        assert_eq!(sent[0].1, info_request());
        assert_eq!(sent[0].2, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn timeout_and_refused_are_not_ready() {
        for err in [TransportError::Timeout, TransportError::Refused] {
            let client = QueryClient::new(ScriptedTransport::new(Err(err)));
            assert!(
                client
                    .query(ADDR.parse().unwrap(), 27015, Duration::from_millis(10))
                    .await
                    .is_none()
            );
        }
    }

    #[tokio::test]
    async fn malformed_reply_is_not_ready() {
        let mut truncated = info_response("de_dust2", 1, false);
        truncated.truncate(12);

        for reply in [truncated, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x41, 0, 0, 0, 0], Vec::new()] {
            let client = QueryClient::new(ScriptedTransport::new(Ok(reply)));
            assert!(
                client
                    .query(ADDR.parse().unwrap(), 27015, Duration::from_millis(10))
                    .await
                    .is_none()
            );
        }
    }

    #[tokio::test]
    async fn udp_transport_round_trip_on_loopback() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, peer) = server.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], info_request().as_slice());
            server
                .send_to(&info_response("de_mirage", 7, false), peer)
                .await
                .unwrap();
        });

        let info = QueryClient::udp()
            .query("127.0.0.1".parse().unwrap(), port, Duration::from_secs(2))
            .await
            .expect("loopback server answers");
        assert_eq!(info.map, "de_mirage");
        assert_eq!(info.players, 7);

        responder.await.unwrap();
    }

    #[tokio::test]
    async fn udp_transport_silent_port_is_not_ready() {
        // bound but never answers
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let res = QueryClient::udp()
            .query("127.0.0.1".parse().unwrap(), port, Duration::from_millis(100))
            .await;
        assert!(res.is_none());
        drop(silent);
    }
}
