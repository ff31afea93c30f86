use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::VersionConfig;
use crate::errors::VersionError;

/// Upstream verdict on an installed version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpToDateCheck {
    pub success: bool,
    pub up_to_date: bool,
    #[serde(default, deserialize_with = "version_string")]
    pub required_version: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    response: UpToDateCheck,
}

/// The upstream reports the version as a bare number; keep it textual either way.
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[async_trait]
pub trait UpstreamVersion: Send + Sync + 'static {
    async fn up_to_date_check(&self, version: &str) -> Result<UpToDateCheck, VersionError>;
}

/// Steam `ISteamApps/UpToDateCheck` over HTTP.
pub struct SteamVersionSource {
    client: reqwest::Client,
    config: VersionConfig,
}

impl SteamVersionSource {
    pub fn new(config: VersionConfig) -> Result<Self, VersionError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, version: &str) -> String {
        format!(
            "{}?appid={}&version={}&format=json",
            self.config.check_url.trim_end_matches('?'),
            self.config.app_id,
            version
        )
    }
}

pub(crate) fn parse_response(body: &str) -> Result<UpToDateCheck, VersionError> {
    serde_json::from_str::<Envelope>(body)
        .map(|envelope| envelope.response)
        .map_err(|e| {
            VersionError::InvalidResponse(format!("failed to parse response: {}, body: {}", e, body))
        })
}

#[async_trait]
impl UpstreamVersion for SteamVersionSource {
    async fn up_to_date_check(&self, version: &str) -> Result<UpToDateCheck, VersionError> {
        let url = self.url(version);
        debug!(%url, "checking upstream version");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_response(&body)
    }
}
