use std::net::IpAddr;

use async_trait::async_trait;
use prac_model::{ComputeTask, TaskOverrides, TaskRef, TaskStatus};

use crate::error::CoreError;

/// One task run request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTask {
    pub cluster: String,
    pub task_definition: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub overrides: TaskOverrides,
}

/// Container orchestration service hosting the game server tasks.
///
/// Task status and network attachment are owned by the control plane; callers only observe them.
#[async_trait]
pub trait FleetControlPlane: Send + Sync + 'static {
    /// Launch the task and return the descriptors of everything that was started.
    async fn run_task(&self, request: RunTask) -> Result<Vec<ComputeTask>, CoreError>;

    async fn stop_task(&self, cluster: &str, task: &TaskRef) -> Result<ComputeTask, CoreError>;

    /// References of tasks in `family` whose desired status is `desired`, in listing order.
    async fn list_tasks(
        &self,
        cluster: &str,
        family: &str,
        desired: TaskStatus,
    ) -> Result<Vec<TaskRef>, CoreError>;

    /// Descriptors for `tasks`; unknown references are omitted.
    async fn describe_tasks(
        &self,
        cluster: &str,
        tasks: &[TaskRef],
    ) -> Result<Vec<ComputeTask>, CoreError>;

    /// Public address of one task, `None` while it is not attached yet.
    async fn task_address(&self, cluster: &str, task: &TaskRef) -> Result<Option<IpAddr>, CoreError> {
        let described = self.describe_tasks(cluster, std::slice::from_ref(task)).await?;
        described
            .into_iter()
            .find(|t| &t.task_ref == task)
            .map(|t| t.address)
            .ok_or_else(|| CoreError::TaskNotFound(task.to_string()))
    }

    async fn running_count(&self, cluster: &str, family: &str) -> Result<usize, CoreError> {
        Ok(self.list_tasks(cluster, family, TaskStatus::Running).await?.len())
    }
}
