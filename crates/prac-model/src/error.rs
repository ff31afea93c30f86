use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: &'static str, reason: String },
}

impl ModelError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}
