//! Source Engine Query (A2S_INFO) client.
//!
//! One request datagram, one response datagram, one timeout. Every failure mode (timeout, refused port, short or malformed packet) collapses to `None`: the probe is telemetry, not a control channel.

mod error;
pub use error::{DecodeError, TransportError};

mod info;
pub use info::{Environment, ExtraData, ServerProbeResult, ServerType};

pub mod packet;

mod transport;
pub use transport::{Transport, UdpTransport};

mod client;
pub use client::{DEFAULT_QUERY_PORT, QueryClient};
