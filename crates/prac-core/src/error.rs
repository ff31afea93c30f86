use prac_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("fleet control plane: {0}")]
    Fleet(String),

    #[error("dns directory: {0}")]
    Dns(String),

    #[error("message queue: {0}")]
    Queue(String),

    #[error("parameter store: {0}")]
    Parameter(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// `true` for failures reported by an external collaborator.
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            CoreError::Fleet(_) | CoreError::Dns(_) | CoreError::Queue(_) | CoreError::Parameter(_)
        )
    }
}

impl From<ModelError> for CoreError {
    fn from(e: ModelError) -> Self {
        CoreError::InvalidRequest(e.to_string())
    }
}
