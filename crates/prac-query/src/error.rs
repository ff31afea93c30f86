use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("packet truncated while reading {0}")]
    Truncated(&'static str),
    #[error("unexpected packet prefix {0:#010x}")]
    UnexpectedPrefix(u32),
    #[error("unexpected response header {0:#04x}")]
    UnexpectedHeader(u8),
    #[error("unexpected {field} byte {value:#04x}")]
    UnexpectedByte { field: &'static str, value: u8 },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no response before timeout")]
    Timeout,
    #[error("connection refused")]
    Refused,
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

impl TransportError {
    /// Timeouts and refused ports both mean the server is not listening yet.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::Refused)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::ConnectionRefused => TransportError::Refused,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => TransportError::Timeout,
            _ => TransportError::Io(e),
        }
    }
}
