use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown LOG_FORMAT {0:?} (expected text, json or journald)")]
    InvalidFormat(String),
    #[error("journald output needs linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("logger initialisation failed: {0}")]
    InitializationFailed(String),
    #[error("unparsable LOG_LEVEL {0:?}")]
    InvalidLogLevel(String),
}
