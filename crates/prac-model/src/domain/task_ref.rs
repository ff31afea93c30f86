use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a compute task as issued by the fleet control plane (an ARN on ECS).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRef(String);

impl TaskRef {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment of the reference, e.g. the task id of an ECS ARN.
    pub fn short_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
