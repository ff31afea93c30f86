use std::net::IpAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use async_trait::async_trait;
use prac_model::{ComputeTask, ResourceSpec, TaskRef, TaskStatus};
use tracing::debug;
use uuid::Uuid;

use crate::error::CoreError;
use crate::fleet::{FleetControlPlane, RunTask};

const STOP_CODE: &str = "UserInitiated";
const STOP_REASON: &str = "Task stopped by user";

struct Entry {
    cluster: String,
    family: String,
    task: ComputeTask,
}

#[derive(Default)]
struct FleetInner {
    entries: Vec<Entry>,
}

/// Fleet control plane keeping its tasks in process memory.
///
/// Tasks stay `PROVISIONING` without an address until [`MemoryFleet::attach`] is called.
#[derive(Clone)]
pub struct MemoryFleet {
    inner: Arc<RwLock<FleetInner>>,
    resources: ResourceSpec,
}

impl Default for MemoryFleet {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFleet {
    pub fn new() -> Self {
        Self::with_resources(ResourceSpec {
            cpu: Some("2048".to_string()),
            memory: Some("4096".to_string()),
        })
    }

    /// Fleet reporting `resources` for every task it runs.
    pub fn with_resources(resources: ResourceSpec) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FleetInner::default())),
            resources,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FleetInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FleetInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Complete network attachment: the task becomes `RUNNING` at `address`.
    pub fn attach(&self, task: &TaskRef, address: IpAddr) -> Result<(), CoreError> {
        let mut inner = self.write();
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| &e.task.task_ref == task)
            .ok_or_else(|| CoreError::TaskNotFound(task.to_string()))?;

        if entry.task.last_status.is_terminal() || entry.task.last_status.is_stopping() {
            return Err(CoreError::InvalidRequest(format!(
                "task {task} is {}",
                entry.task.last_status
            )));
        }

        entry.task.address = Some(address);
        entry.task.last_status = TaskStatus::Running;
        entry.task.started_at.get_or_insert_with(SystemTime::now);
        debug!(task = %task, %address, "task attached");
        Ok(())
    }

    /// Tasks still waiting for a network attachment.
    pub fn unattached(&self) -> Vec<TaskRef> {
        self.read()
            .entries
            .iter()
            .filter(|e| e.task.address.is_none() && e.task.desired_status == TaskStatus::Running)
            .map(|e| e.task.task_ref.clone())
            .collect()
    }

    /// Snapshot of every task ever run, stopped ones included.
    pub fn tasks(&self) -> Vec<ComputeTask> {
        self.read().entries.iter().map(|e| e.task.clone()).collect()
    }
}

/// `family:revision` -> `family`.
fn family_of(task_definition: &str) -> &str {
    let name = task_definition.rsplit('/').next().unwrap_or(task_definition);
    name.split(':').next().unwrap_or(name)
}

#[async_trait]
impl FleetControlPlane for MemoryFleet {
    async fn run_task(&self, request: RunTask) -> Result<Vec<ComputeTask>, CoreError> {
        if request.subnets.is_empty() {
            return Err(CoreError::Fleet("network configuration requires a subnet".into()));
        }

        let task_ref = TaskRef::from(format!(
            "arn:local:fleet:task/{}/{}",
            request.cluster,
            Uuid::new_v4().simple()
        ));
        let task = ComputeTask::provisioning(task_ref, self.resources.clone(), request.overrides);

        self.write().entries.push(Entry {
            cluster: request.cluster,
            family: family_of(&request.task_definition).to_string(),
            task: task.clone(),
        });
        Ok(vec![task])
    }

    async fn stop_task(&self, cluster: &str, task: &TaskRef) -> Result<ComputeTask, CoreError> {
        let mut inner = self.write();
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.cluster == cluster && &e.task.task_ref == task)
            .ok_or_else(|| CoreError::TaskNotFound(task.to_string()))?;

        let now = SystemTime::now();
        let stopped = &mut entry.task;
        stopped.desired_status = TaskStatus::Stopped;
        stopped.last_status = TaskStatus::Stopped;
        stopped.address = None;
        stopped.stopping_at.get_or_insert(now);
        stopped.stopped_at.get_or_insert(now);
        stopped.stop_code.get_or_insert_with(|| STOP_CODE.to_string());
        stopped.stopped_reason.get_or_insert_with(|| STOP_REASON.to_string());
        Ok(stopped.clone())
    }

    async fn list_tasks(
        &self,
        cluster: &str,
        family: &str,
        desired: TaskStatus,
    ) -> Result<Vec<TaskRef>, CoreError> {
        Ok(self
            .read()
            .entries
            .iter()
            .filter(|e| e.cluster == cluster && e.family == family)
            .filter(|e| e.task.desired_status == desired)
            .map(|e| e.task.task_ref.clone())
            .collect())
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        tasks: &[TaskRef],
    ) -> Result<Vec<ComputeTask>, CoreError> {
        let inner = self.read();
        Ok(tasks
            .iter()
            .filter_map(|wanted| {
                inner
                    .entries
                    .iter()
                    .find(|e| e.cluster == cluster && &e.task.task_ref == wanted)
                    .map(|e| e.task.clone())
            })
            .collect())
    }
}
