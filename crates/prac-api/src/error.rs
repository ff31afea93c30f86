use prac_core::CoreError;
use prac_model::ModelError;
use prac_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("version check failed: {0}")]
    Version(#[from] VersionError),
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

fn core_status(e: &CoreError) -> u16 {
    match e {
        CoreError::InvalidRequest(_) => 400,
        CoreError::TaskNotFound(_) => 404,
        CoreError::Config(_) => 500,
        CoreError::Fleet(_) | CoreError::Dns(_) | CoreError::Queue(_) | CoreError::Parameter(_) => 502,
    }
}

impl ApiError {
    /// HTTP status reported in the response envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::Internal(_) => 500,
            ApiError::Core(e) => core_status(e),
            ApiError::Version(VersionError::Core(e)) => core_status(e),
            ApiError::Version(_) => 502,
        }
    }
}
