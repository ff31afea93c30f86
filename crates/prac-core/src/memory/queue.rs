use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use prac_model::RetryMessage;
use tokio::sync::Notify;

use crate::error::CoreError;
use crate::queue::{MessageQueue, RetrySource};

struct QueueInner {
    name: String,
    messages: Mutex<State>,
    notify: Notify,
}

#[derive(Default)]
struct State {
    pending: VecDeque<RetryMessage>,
    closed: bool,
}

/// Single named queue that is both the producer and the consumer end of the retry bus.
#[derive(Clone)]
pub struct MemoryQueue {
    inner: Arc<QueueInner>,
}

impl MemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                name: name.into(),
                messages: Mutex::new(State::default()),
                notify: Notify::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, message: RetryMessage) -> Result<(), CoreError> {
        let mut state = self.state();
        if state.closed {
            return Err(CoreError::Queue(format!("queue {} is closed", self.inner.name)));
        }
        state.pending.push_back(message);
        drop(state);
        self.inner.notify.notify_one();
        Ok(())
    }

    /// Messages waiting for delivery, oldest first.
    pub fn pending(&self) -> Vec<RetryMessage> {
        self.state().pending.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting messages; consumers drain what is left and then see `None`.
    pub fn close(&self) {
        self.state().closed = true;
        self.inner.notify.notify_waiters();
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn send(&self, queue: &str, message: &RetryMessage) -> Result<(), CoreError> {
        if queue != self.inner.name {
            return Err(CoreError::Queue(format!("unknown queue {queue}")));
        }
        self.push(message.clone())
    }
}

#[async_trait]
impl RetrySource for MemoryQueue {
    async fn next(&self) -> Option<RetryMessage> {
        loop {
            let notified = self.inner.notify.notified();
            {
                let mut state = self.state();
                if let Some(message) = state.pending.pop_front() {
                    return Some(message);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    async fn redeliver(&self, message: RetryMessage) -> Result<(), CoreError> {
        self.push(message)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use prac_model::TaskRef;

    use super::*;

    fn message(id: &str) -> RetryMessage {
        RetryMessage::new(TaskRef::from(id), UNIX_EPOCH + Duration::from_secs(100))
    }

    #[tokio::test]
    async fn delivers_in_send_order() {
        let queue = MemoryQueue::new("hostname");
        queue.send("hostname", &message("a")).await.unwrap();
        queue.send("hostname", &message("b")).await.unwrap();

        assert_eq!(queue.next().await, Some(message("a")));
        assert_eq!(queue.next().await, Some(message("b")));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn unknown_queue_is_a_collaborator_failure() {
        let queue = MemoryQueue::new("hostname");
        let err = queue.send("other", &message("a")).await.unwrap_err();
        assert!(err.is_collaborator());
    }

    #[tokio::test]
    async fn next_wakes_on_send() {
        let queue = MemoryQueue::new("hostname");
        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.next().await })
        };
        tokio::task::yield_now().await;
        queue.send("hostname", &message("late")).await.unwrap();

        assert_eq!(consumer.await.unwrap(), Some(message("late")));
    }

    #[tokio::test]
    async fn closed_queue_drains_then_ends() {
        let queue = MemoryQueue::new("hostname");
        queue.redeliver(message("a")).await.unwrap();
        queue.close();

        assert_eq!(queue.next().await, Some(message("a")));
        assert_eq!(queue.next().await, None);
        assert!(queue.redeliver(message("b")).await.is_err());
    }
}
