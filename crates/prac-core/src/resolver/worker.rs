use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use super::HostnameResolver;
use crate::queue::RetrySource;

/// Consume retry messages until `cancel` fires or `source` closes.
///
/// Each message waits `delay` before it is handed to the resolver. A collaborator failure puts the message back while it is still within the budget; any other failure drops it.
pub async fn run_worker<S>(
    source: Arc<S>,
    resolver: Arc<HostnameResolver>,
    delay: Duration,
    cancel: CancellationToken,
) where
    S: RetrySource + ?Sized,
{
    info!(delay_ms = delay.as_millis() as u64, "hostname worker started");

    loop {
        let message = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = source.next() => match next {
                Some(message) => message,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                if let Err(e) = source.redeliver(message).await {
                    error!(error = %e, "failed to return message on shutdown");
                }
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        match resolver.handle(&message).await {
            Ok(outcome) => {
                trace!(task = %message.task_ref, state = %outcome.state(), "delivery handled");
            }
            Err(e) if e.is_collaborator() && !resolver.is_expired(&message) => {
                error!(task = %message.task_ref, error = %e, "resolution failed, redelivering");
                if let Err(e) = source.redeliver(message).await {
                    error!(error = %e, "redelivery failed, message lost");
                }
            }
            Err(e) => {
                error!(task = %message.task_ref, error = %e, "resolution failed, dropping message");
            }
        }
    }

    info!("hostname worker stopped");
}
