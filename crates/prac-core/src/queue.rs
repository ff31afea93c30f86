use async_trait::async_trait;
use prac_model::RetryMessage;

use crate::error::CoreError;

/// Producer side of the at-least-once retry bus.
#[async_trait]
pub trait MessageQueue: Send + Sync + 'static {
    async fn send(&self, queue: &str, message: &RetryMessage) -> Result<(), CoreError>;
}

/// Consumer side of the retry bus, as seen by the resolver worker.
#[async_trait]
pub trait RetrySource: Send + Sync + 'static {
    /// Wait for the next delivery; `None` once the source is closed.
    async fn next(&self) -> Option<RetryMessage>;

    /// Put a message back after a failed invocation.
    async fn redeliver(&self, message: RetryMessage) -> Result<(), CoreError>;
}
