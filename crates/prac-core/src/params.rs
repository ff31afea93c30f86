use async_trait::async_trait;

use crate::error::CoreError;

/// Key/value store persisting the installed server version.
#[async_trait]
pub trait ParameterStore: Send + Sync + 'static {
    /// `None` when the parameter does not exist.
    async fn get(&self, name: &str) -> Result<Option<String>, CoreError>;

    /// Store `value`; with `overwrite == false` an existing parameter is an error.
    async fn put(&self, name: &str, value: &str, overwrite: bool) -> Result<(), CoreError>;
}
