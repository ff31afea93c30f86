//! Starting, stopping and refreshing the server task.

use std::sync::Arc;

use prac_model::{ComputeTask, RetryMessage, ServerStartRequest, TaskEnv, TaskRef, UPDATE_ONLY_ENV};
use tracing::{debug, info, instrument};

use crate::clock::Clock;
use crate::config::{FleetConfig, HostnameConfig};
use crate::dns::DnsDirectory;
use crate::error::CoreError;
use crate::fleet::FleetControlPlane;
use crate::queue::MessageQueue;

/// Drives task runs and stops on the fleet, keeping DNS bindings consistent with them.
#[derive(Clone)]
pub struct LifecycleController {
    fleet_config: FleetConfig,
    hostname: Option<HostnameConfig>,
    fleet: Arc<dyn FleetControlPlane>,
    dns: Arc<dyn DnsDirectory>,
    queue: Arc<dyn MessageQueue>,
    clock: Arc<dyn Clock>,
}

impl LifecycleController {
    pub fn new(
        fleet_config: FleetConfig,
        hostname: Option<HostnameConfig>,
        fleet: Arc<dyn FleetControlPlane>,
        dns: Arc<dyn DnsDirectory>,
        queue: Arc<dyn MessageQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fleet_config,
            hostname,
            fleet,
            dns,
            queue,
            clock,
        }
    }

    /// Launch one server task and, with hostname binding enabled, enqueue its first resolution attempt.
    ///
    /// Returns as soon as the fleet accepted the run.
    #[instrument(level = "info", skip_all)]
    pub async fn start(&self, request: &ServerStartRequest) -> Result<TaskRef, CoreError> {
        let environment = request.to_env()?;
        let task = self
            .run_one(&self.fleet_config.task_definition, environment)
            .await?;

        if let Some(hostname) = &self.hostname {
            let message = RetryMessage::new(task.clone(), self.clock.now());
            self.queue.send(&hostname.queue, &message).await?;
            debug!(task = %task, queue = %hostname.queue, "hostname resolution enqueued");
        }

        info!(task = %task, "server task started");
        Ok(task)
    }

    /// Delete every hostname bound to the task's address, then stop the task.
    ///
    /// A task without an address yet has nothing to clean up.
    #[instrument(level = "info", skip_all, fields(task = %task))]
    pub async fn stop(&self, task: &TaskRef) -> Result<ComputeTask, CoreError> {
        let cluster = &self.fleet_config.cluster;

        if let Some(hostname) = &self.hostname {
            match self.fleet.task_address(cluster, task).await? {
                Some(address) => {
                    let names = self.dns.hostnames_for(&hostname.zone, address).await?;
                    for name in &names {
                        self.dns.delete_record(&hostname.zone, name, address).await?;
                        info!(hostname = %name, %address, "hostname deleted");
                    }
                }
                None => debug!("task has no address, skipping dns cleanup"),
            }
        }

        let stopped = self.fleet.stop_task(cluster, task).await?;
        info!(status = %stopped.last_status, "server task stopping");
        Ok(stopped)
    }

    /// Run the refresh-only task that updates the server image.
    #[instrument(level = "info", skip_all)]
    pub async fn update_image(&self) -> Result<TaskRef, CoreError> {
        let task = self
            .run_one(
                &self.fleet_config.update_task_definition,
                TaskEnv::single(UPDATE_ONLY_ENV, "1"),
            )
            .await?;
        info!(task = %task, "update task started");
        Ok(task)
    }

    async fn run_one(&self, task_definition: &str, environment: TaskEnv) -> Result<TaskRef, CoreError> {
        let request = self.fleet_config.run_request(task_definition, environment);
        self.fleet
            .run_task(request)
            .await?
            .into_iter()
            .next()
            .map(|t| t.task_ref)
            .ok_or_else(|| CoreError::Fleet(format!("no task started for {task_definition}")))
    }
}
