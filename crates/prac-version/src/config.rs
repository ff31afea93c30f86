use std::time::Duration;

use prac_core::VersionParams;

#[derive(Debug, Clone)]
pub struct VersionConfig {
    /// Parameter holding the installed version.
    pub parameter: String,
    pub app_id: u32,
    pub check_url: String,
    pub timeout: Duration,
}

impl From<&VersionParams> for VersionConfig {
    fn from(params: &VersionParams) -> Self {
        Self {
            parameter: params.parameter.clone(),
            app_id: params.app_id,
            check_url: params.check_url.clone(),
            timeout: Duration::from_secs(10),
        }
    }
}
