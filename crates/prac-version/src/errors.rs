use prac_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
