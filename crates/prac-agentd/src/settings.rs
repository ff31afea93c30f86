use std::net::IpAddr;

use envconfig::Envconfig;

/// Process-level settings; the server configuration itself lives in `PracConfig`.
#[derive(Envconfig, Clone, Debug)]
pub struct AgentSettings {
    #[envconfig(from = "HTTP_PORT", default = "8080")]
    pub http_port: u16,
    #[envconfig(from = "LOG_FORMAT", default = "text")]
    pub log_format: String,
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,
    /// Address the in-memory fleet gives to provisioning tasks.
    #[envconfig(from = "LOCAL_TASK_ADDRESS")]
    pub local_task_address: Option<IpAddr>,
    #[envconfig(from = "LOCAL_ATTACH_DELAY_MS", default = "10000")]
    pub local_attach_delay_ms: u64,
    /// Initial value of the stored server version.
    #[envconfig(from = "LOCAL_SERVER_VERSION")]
    pub local_server_version: Option<String>,
}
