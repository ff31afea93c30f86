use std::sync::Arc;

use prac_core::{CoreError, LifecycleController, ParameterStore};
use prac_model::TaskRef;
use tracing::{info, instrument};

use crate::config::VersionConfig;
use crate::errors::VersionError;
use crate::source::UpstreamVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    UpToDate,
    /// Stored pointer moved to `required_version` and the refresh task launched.
    Updating { required_version: String, task: TaskRef },
}

pub struct VersionChecker {
    config: VersionConfig,
    params: Arc<dyn ParameterStore>,
    upstream: Arc<dyn UpstreamVersion>,
    lifecycle: LifecycleController,
}

impl VersionChecker {
    pub fn new(
        config: VersionConfig,
        params: Arc<dyn ParameterStore>,
        upstream: Arc<dyn UpstreamVersion>,
        lifecycle: LifecycleController,
    ) -> Self {
        Self {
            config,
            params,
            upstream,
            lifecycle,
        }
    }

    /// Compare the stored version with upstream and refresh the image when it is stale.
    ///
    /// The parameter is written before the update task runs.
    #[instrument(level = "info", skip_all, fields(param = %self.config.parameter))]
    pub async fn check_version(&self) -> Result<VersionOutcome, VersionError> {
        let current = self
            .params
            .get(&self.config.parameter)
            .await?
            .ok_or_else(|| CoreError::Parameter(format!("parameter {} not found", self.config.parameter)))?;
        info!(version = %current, "installed server version");

        let check = self.upstream.up_to_date_check(&current).await?;
        if !check.success {
            return Err(VersionError::InvalidResponse(
                check.message.unwrap_or_else(|| "upstream reported failure".to_string()),
            ));
        }
        if check.up_to_date {
            info!("server is up to date");
            return Ok(VersionOutcome::UpToDate);
        }
        let required_version = check.required_version.ok_or_else(|| {
            VersionError::InvalidResponse("stale version without required_version".to_string())
        })?;

        info!(%required_version, "server is out of date");
        self.params
            .put(&self.config.parameter, &required_version, true)
            .await?;
        let task = self.lifecycle.update_image().await?;

        Ok(VersionOutcome::Updating {
            required_version,
            task,
        })
    }
}
