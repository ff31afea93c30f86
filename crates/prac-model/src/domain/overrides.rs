use serde::{Deserialize, Serialize};

use crate::TaskEnv;

/// Per-container override block attached to a task run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOverride {
    pub name: String,
    #[serde(default)]
    pub environment: TaskEnv,
}

/// Overrides submitted with a task run and echoed back by task descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverrides {
    #[serde(default)]
    pub container_overrides: Vec<ContainerOverride>,
}

impl TaskOverrides {
    /// Overrides targeting a single container.
    pub fn for_container(name: impl Into<String>, environment: TaskEnv) -> Self {
        Self {
            container_overrides: vec![ContainerOverride {
                name: name.into(),
                environment,
            }],
        }
    }

    /// Environment overrides of the named container, if any were submitted.
    pub fn environment(&self, container: &str) -> Option<&TaskEnv> {
        self.container_overrides
            .iter()
            .find(|c| c.name == container)
            .map(|c| &c.environment)
    }

    pub fn is_empty(&self) -> bool {
        self.container_overrides
            .iter()
            .all(|c| c.environment.is_empty())
    }
}
