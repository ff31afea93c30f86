use std::net::IpAddr;
use std::time::SystemTime;

use crate::{TaskOverrides, TaskRef, TaskStatus};

/// Resource reservation of a task, as the fleet reports it (e.g. `"2048"` CPU units).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSpec {
    pub cpu: Option<String>,
    pub memory: Option<String>,
}

/// Descriptor of one compute task hosting a game server.
///
/// `address` is attached asynchronously by the fleet and stays `None` until the task's network interface has a public address.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeTask {
    pub task_ref: TaskRef,
    pub last_status: TaskStatus,
    pub desired_status: TaskStatus,
    pub address: Option<IpAddr>,
    pub resources: ResourceSpec,
    pub overrides: TaskOverrides,
    pub started_at: Option<SystemTime>,
    pub stopping_at: Option<SystemTime>,
    pub stopped_at: Option<SystemTime>,
    pub stop_code: Option<String>,
    pub stopped_reason: Option<String>,
}

impl ComputeTask {
    /// A freshly submitted task: provisioning, no address, no timestamps.
    pub fn provisioning(task_ref: TaskRef, resources: ResourceSpec, overrides: TaskOverrides) -> Self {
        Self {
            task_ref,
            last_status: TaskStatus::Provisioning,
            desired_status: TaskStatus::Running,
            address: None,
            resources,
            overrides,
            started_at: None,
            stopping_at: None,
            stopped_at: None,
            stop_code: None,
            stopped_reason: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.last_status == TaskStatus::Running
    }
}
