use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::TaskRef;

/// Payload of one hostname-resolution attempt.
///
/// Created once per start request and re-emitted unchanged while the task has no address; `start_time` is what bounds the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryMessage {
    #[serde(rename = "taskRef")]
    pub task_ref: TaskRef,
    #[serde(with = "time_serde")]
    pub start_time: SystemTime,
}

impl RetryMessage {
    pub fn new(task_ref: TaskRef, start_time: SystemTime) -> Self {
        Self {
            task_ref,
            start_time,
        }
    }

    /// Time spent since the first attempt; zero when `now` is behind `start_time`.
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        now.duration_since(self.start_time).unwrap_or(Duration::ZERO)
    }
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        since_epoch.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .ok_or_else(|| serde::de::Error::custom("start_time out of range"))
    }
}
