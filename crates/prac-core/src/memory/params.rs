use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::params::ParameterStore;

#[derive(Clone, Default)]
pub struct MemoryParameters {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one parameter.
    pub fn with(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        store
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

#[async_trait]
impl ParameterStore for MemoryParameters {
    async fn get(&self, name: &str) -> Result<Option<String>, CoreError> {
        Ok(self.value(name))
    }

    async fn put(&self, name: &str, value: &str, overwrite: bool) -> Result<(), CoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        if !overwrite && values.contains_key(name) {
            return Err(CoreError::Parameter(format!("parameter {name} already exists")));
        }
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_respects_overwrite_flag() {
        let store = MemoryParameters::with("/prac/version", "1.38.2.1");

        assert!(store.put("/prac/version", "1.38.2.2", false).await.is_err());
        store.put("/prac/version", "1.38.2.2", true).await.unwrap();
        assert_eq!(store.get("/prac/version").await.unwrap().as_deref(), Some("1.38.2.2"));
        assert_eq!(store.get("/missing").await.unwrap(), None);
    }
}
