use async_trait::async_trait;
use prac_core::Resolution;
use prac_model::{CompositeStatus, ComputeTask, RetryMessage, ServerStartRequest, TaskRef};
use prac_version::VersionOutcome;

use crate::error::ApiError;

/// Server lifecycle API handler.
///
/// Every method is one short-lived invocation; the HTTP layer and queue-driven callers both go through it.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Launch the game server; returns the started task references.
    async fn start_server(&self, request: ServerStartRequest) -> Result<Vec<TaskRef>, ApiError>;

    /// Remove the server's hostnames and stop its task.
    async fn stop_server(&self, task: &TaskRef) -> Result<ComputeTask, ApiError>;

    /// Composite status of every running server.
    async fn get_status(&self) -> Result<Vec<CompositeStatus>, ApiError>;

    /// Force one refresh-only task run.
    async fn update_image(&self) -> Result<Vec<TaskRef>, ApiError>;

    async fn check_version(&self) -> Result<VersionOutcome, ApiError>;

    /// Process one hostname retry message.
    async fn resolve_hostname(&self, message: RetryMessage) -> Result<Resolution, ApiError>;
}
