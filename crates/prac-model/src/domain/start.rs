use serde::{Deserialize, Serialize};

use crate::{ModelError, TaskEnv};

/// Options accepted by a server start, each mapped to one container environment variable.
///
/// Unknown options are rejected at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerStartRequest {
    /// `64` or `128`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickrate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapgroup: Option<String>,
    /// Numeric workshop collection id the server pulls maps from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_start_map: Option<String>,
}

const TICKRATES: [&str; 2] = ["64", "128"];

impl ServerStartRequest {
    fn options(&self) -> [(&'static str, &'static str, Option<&str>); 5] {
        [
            ("tickrate", "TICKRATE", self.tickrate.as_deref()),
            ("map", "MAP", self.map.as_deref()),
            ("mapgroup", "MAPGROUP", self.mapgroup.as_deref()),
            (
                "workshop_collection",
                "HOST_WORKSHOP_COLLECTION",
                self.workshop_collection.as_deref(),
            ),
            (
                "workshop_start_map",
                "WORKSHOP_START_MAP",
                self.workshop_start_map.as_deref(),
            ),
        ]
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        for (option, _, value) in self.options() {
            if let Some(v) = value
                && v.trim().is_empty()
            {
                return Err(ModelError::invalid(option, "value cannot be empty"));
            }
        }

        if let Some(t) = self.tickrate.as_deref()
            && !TICKRATES.contains(&t)
        {
            return Err(ModelError::invalid(
                "tickrate",
                format!("'{t}' (valid: 64, 128)"),
            ));
        }

        if let Some(id) = self.workshop_collection.as_deref()
            && !id.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ModelError::invalid(
                "workshop_collection",
                format!("'{id}' is not a numeric id"),
            ));
        }
        Ok(())
    }

    /// Validated environment overrides, in a fixed option order and with values passed through verbatim.
    pub fn to_env(&self) -> Result<TaskEnv, ModelError> {
        self.validate()?;

        let mut env = TaskEnv::new();
        for (_, name, value) in self.options() {
            if let Some(v) = value {
                env.push(name, v);
            }
        }
        Ok(env)
    }
}
