use std::sync::Arc;

use async_trait::async_trait;
use prac_core::{HostnameResolver, LifecycleController, Resolution, StatusAggregator};
use prac_model::{CompositeStatus, ComputeTask, RetryMessage, ServerStartRequest, TaskRef};
use prac_version::{VersionChecker, VersionOutcome};

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// [`ApiHandler`] delegating to the core components.
pub struct PracApiAdapter {
    lifecycle: LifecycleController,
    status: Arc<StatusAggregator>,
    resolver: Option<Arc<HostnameResolver>>,
    version: Arc<VersionChecker>,
}

impl PracApiAdapter {
    /// `resolver` is `None` when hostname binding is disabled.
    pub fn new(
        lifecycle: LifecycleController,
        status: Arc<StatusAggregator>,
        resolver: Option<Arc<HostnameResolver>>,
        version: Arc<VersionChecker>,
    ) -> Self {
        Self {
            lifecycle,
            status,
            resolver,
            version,
        }
    }
}

#[async_trait]
impl ApiHandler for PracApiAdapter {
    async fn start_server(&self, request: ServerStartRequest) -> Result<Vec<TaskRef>, ApiError> {
        request.validate()?;
        let task = self.lifecycle.start(&request).await?;
        Ok(vec![task])
    }

    async fn stop_server(&self, task: &TaskRef) -> Result<ComputeTask, ApiError> {
        if task.as_str().trim().is_empty() {
            return Err(ApiError::InvalidRequest("task_arn cannot be empty".into()));
        }
        Ok(self.lifecycle.stop(task).await?)
    }

    async fn get_status(&self) -> Result<Vec<CompositeStatus>, ApiError> {
        Ok(self.status.get_status().await?)
    }

    async fn update_image(&self) -> Result<Vec<TaskRef>, ApiError> {
        Ok(vec![self.lifecycle.update_image().await?])
    }

    async fn check_version(&self) -> Result<VersionOutcome, ApiError> {
        Ok(self.version.check_version().await?)
    }

    async fn resolve_hostname(&self, message: RetryMessage) -> Result<Resolution, ApiError> {
        let resolver = self
            .resolver
            .as_ref()
            .ok_or_else(|| ApiError::InvalidRequest("hostname binding is disabled".into()))?;
        Ok(resolver.handle(&message).await?)
    }
}
