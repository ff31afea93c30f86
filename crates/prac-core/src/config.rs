//! Process configuration.
//!
//! The environment is read exactly once into [`EnvSettings`] and converted into a typed [`PracConfig`]; components receive the sub-structs they need and never consult the environment themselves.

use std::time::Duration;

use envconfig::Envconfig;
use prac_model::{TaskEnv, TaskOverrides};

use crate::error::CoreError;
use crate::fleet::RunTask;

#[derive(Envconfig, Clone, Debug)]
pub struct EnvSettings {
    #[envconfig(from = "ECS_CLUSTER")]
    pub cluster: String,
    #[envconfig(from = "TASK_DEFN")]
    pub task_definition: String,
    #[envconfig(from = "UPDATE_TASK_DEFN")]
    pub update_task_definition: Option<String>,
    #[envconfig(from = "TASK_FAMILY")]
    pub task_family: String,
    /// Comma separated.
    #[envconfig(from = "SUBNETS")]
    pub subnets: String,
    /// Comma separated.
    #[envconfig(from = "SECURITY_GROUPS", default = "")]
    pub security_groups: String,
    #[envconfig(from = "CONTAINER_NAME")]
    pub container_name: String,

    #[envconfig(from = "HOSTED_ZONE_ID")]
    pub hosted_zone_id: Option<String>,
    #[envconfig(from = "DNS_HOSTNAME")]
    pub dns_hostname: Option<String>,
    #[envconfig(from = "GET_HOSTNAME_QUEUE")]
    pub hostname_queue: Option<String>,
    #[envconfig(from = "SUBDOMAIN_PREFIX", default = "csgo")]
    pub subdomain_prefix: String,
    #[envconfig(from = "HOSTNAME_BUDGET_SECS", default = "600")]
    pub hostname_budget_secs: u64,
    #[envconfig(from = "REDELIVERY_DELAY_MS", default = "5000")]
    pub redelivery_delay_ms: u64,

    #[envconfig(from = "QUERY_PORT", default = "27015")]
    pub query_port: u16,
    #[envconfig(from = "PROBE_TIMEOUT_MS", default = "1000")]
    pub probe_timeout_ms: u64,

    #[envconfig(from = "SERVER_VERSION_PARAM", default = "/prac/server-version")]
    pub server_version_param: String,
    #[envconfig(from = "STEAM_APP_ID", default = "730")]
    pub steam_app_id: u32,
    #[envconfig(
        from = "VERSION_CHECK_URL",
        default = "http://api.steampowered.com/ISteamApps/UpToDateCheck/v0001/"
    )]
    pub version_check_url: String,
}

/// Where and how server tasks are launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    pub cluster: String,
    pub task_definition: String,
    pub update_task_definition: String,
    pub task_family: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub container_name: String,
}

impl FleetConfig {
    /// Run request for `task_definition` with `environment` applied to the server container.
    pub fn run_request(&self, task_definition: &str, environment: TaskEnv) -> RunTask {
        RunTask {
            cluster: self.cluster.clone(),
            task_definition: task_definition.to_string(),
            subnets: self.subnets.clone(),
            security_groups: self.security_groups.clone(),
            overrides: TaskOverrides::for_container(&self.container_name, environment),
        }
    }
}

/// Hostname binding; absent when the deployment has no DNS zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameConfig {
    pub zone: String,
    pub domain: String,
    pub prefix: String,
    pub queue: String,
    pub budget: Duration,
    pub redelivery_delay: Duration,
}

impl HostnameConfig {
    /// `<prefix><index>.<domain>`.
    pub fn hostname(&self, index: usize) -> String {
        format!(
            "{}{}.{}",
            self.prefix,
            index,
            self.domain.trim_start_matches('.').trim_end_matches('.')
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub port: u16,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParams {
    pub parameter: String,
    pub app_id: u32,
    pub check_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracConfig {
    pub fleet: FleetConfig,
    pub hostname: Option<HostnameConfig>,
    pub probe: ProbeConfig,
    pub version: VersionParams,
}

impl PracConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let env = EnvSettings::init_from_env().map_err(|e| CoreError::Config(e.to_string()))?;
        Self::try_from(env)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(name: &str, value: String) -> Result<String, CoreError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(CoreError::Config(format!("{name} cannot be empty")));
    }
    Ok(value)
}

impl TryFrom<EnvSettings> for PracConfig {
    type Error = CoreError;

    fn try_from(env: EnvSettings) -> Result<Self, Self::Error> {
        let task_definition = required("TASK_DEFN", env.task_definition)?;
        let update_task_definition = match env.update_task_definition {
            Some(defn) if !defn.trim().is_empty() => defn.trim().to_string(),
            _ => task_definition.clone(),
        };

        let subnets = split_list(&env.subnets);
        if subnets.is_empty() {
            return Err(CoreError::Config("SUBNETS must list at least one subnet".into()));
        }

        let fleet = FleetConfig {
            cluster: required("ECS_CLUSTER", env.cluster)?,
            task_definition,
            update_task_definition,
            task_family: required("TASK_FAMILY", env.task_family)?,
            subnets,
            security_groups: split_list(&env.security_groups),
            container_name: required("CONTAINER_NAME", env.container_name)?,
        };

        let hostname = match (env.hosted_zone_id, env.dns_hostname, env.hostname_queue) {
            (None, None, None) => None,
            (Some(zone), Some(domain), Some(queue)) => {
                if env.hostname_budget_secs == 0 {
                    return Err(CoreError::Config("HOSTNAME_BUDGET_SECS must be positive".into()));
                }
                Some(HostnameConfig {
                    zone: required("HOSTED_ZONE_ID", zone)?,
                    domain: required("DNS_HOSTNAME", domain)?,
                    prefix: env.subdomain_prefix,
                    queue: required("GET_HOSTNAME_QUEUE", queue)?,
                    budget: Duration::from_secs(env.hostname_budget_secs),
                    redelivery_delay: Duration::from_millis(env.redelivery_delay_ms),
                })
            }
            _ => {
                return Err(CoreError::Config(
                    "HOSTED_ZONE_ID, DNS_HOSTNAME and GET_HOSTNAME_QUEUE must be set together".into(),
                ));
            }
        };

        Ok(PracConfig {
            fleet,
            hostname,
            probe: ProbeConfig {
                port: env.query_port,
                timeout: Duration::from_millis(env.probe_timeout_ms),
            },
            version: VersionParams {
                parameter: required("SERVER_VERSION_PARAM", env.server_version_param)?,
                app_id: env.steam_app_id,
                check_url: required("VERSION_CHECK_URL", env.version_check_url)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<String, String> {
        [
            ("ECS_CLUSTER", "prac-cluster"),
            ("TASK_DEFN", "csgo-server:4"),
            ("TASK_FAMILY", "csgo-server"),
            ("SUBNETS", "subnet-a, subnet-b"),
            ("SECURITY_GROUPS", "sg-1"),
            ("CONTAINER_NAME", "csgo"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn load(env: &HashMap<String, String>) -> Result<PracConfig, CoreError> {
        let settings =
            EnvSettings::init_from_hashmap(env).map_err(|e| CoreError::Config(e.to_string()))?;
        PracConfig::try_from(settings)
    }

    #[test]
    fn minimal_env_disables_hostname_binding() {
        let cfg = load(&base_env()).unwrap();

        assert_eq!(cfg.fleet.subnets, vec!["subnet-a", "subnet-b"]);
        assert_eq!(cfg.fleet.security_groups, vec!["sg-1"]);
        assert_eq!(cfg.fleet.update_task_definition, "csgo-server:4");
        assert!(cfg.hostname.is_none());
        assert_eq!(cfg.probe.port, 27015);
        assert_eq!(cfg.probe.timeout, Duration::from_millis(1000));
        assert_eq!(cfg.version.app_id, 730);
    }

    #[test]
    fn complete_hostname_settings_enable_binding() {
        let mut env = base_env();
        env.insert("HOSTED_ZONE_ID".into(), "Z123".into());
        env.insert("DNS_HOSTNAME".into(), "example.com".into());
        env.insert("GET_HOSTNAME_QUEUE".into(), "get-hostname".into());
        env.insert("UPDATE_TASK_DEFN".into(), "csgo-update:1".into());

        let cfg = load(&env).unwrap();
        let hostname = cfg.hostname.expect("binding enabled");
        assert_eq!(hostname.budget, Duration::from_secs(600));
        assert_eq!(hostname.prefix, "csgo");
        assert_eq!(hostname.hostname(2), "csgo2.example.com");
        assert_eq!(cfg.fleet.update_task_definition, "csgo-update:1");
    }

    #[test]
    fn partial_hostname_settings_are_rejected() {
        let mut env = base_env();
        env.insert("HOSTED_ZONE_ID".into(), "Z123".into());

        assert!(matches!(load(&env), Err(CoreError::Config(_))));
    }

    #[test]
    fn empty_subnets_are_rejected() {
        let mut env = base_env();
        env.insert("SUBNETS".into(), " , ".into());

        assert!(matches!(load(&env), Err(CoreError::Config(_))));
    }

    #[test]
    fn missing_required_variable_is_rejected() {
        let mut env = base_env();
        env.remove("ECS_CLUSTER");

        assert!(load(&env).is_err());
    }

    #[test]
    fn run_request_targets_container() {
        let cfg = load(&base_env()).unwrap();
        let run = cfg
            .fleet
            .run_request(&cfg.fleet.task_definition, TaskEnv::single("MAP", "de_dust2"));

        assert_eq!(run.cluster, "prac-cluster");
        assert_eq!(
            run.overrides
                .environment("csgo")
                .and_then(|e| e.get("MAP")),
            Some("de_dust2")
        );
    }
}
