use std::net::IpAddr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};

use crate::{TaskOverrides, TaskRef, TaskStatus};

/// Format a task timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(at: SystemTime) -> Option<String> {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from(at).format(fmt).ok()
}

/// Aggregated view of one running server: fleet descriptor, bound hostnames and live probe.
///
/// `server_ready == false` with `map == None` is the normal shape while the game server is still booting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeStatus {
    pub task_arn: TaskRef,
    pub public_ip: Option<IpAddr>,
    pub hostnames: Vec<String>,
    pub started_at: Option<String>,
    pub last_status: TaskStatus,
    pub desired_status: TaskStatus,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub overrides: TaskOverrides,
    pub stop_code: Option<String>,
    pub stopped_reason: Option<String>,
    pub stopping_at: Option<String>,
    pub stopped_at: Option<String>,
    pub server_ready: bool,
    pub map: Option<String>,
    pub players: Option<u8>,
    pub max_players: Option<u8>,
    pub bots: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn formats_utc_timestamp() {
        let at = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(format_timestamp(at).as_deref(), Some("2020-09-13 12:26:40"));
    }

    #[test]
    fn serializes_camel_case_fields() {
        let status = CompositeStatus {
            task_arn: TaskRef::from("task/1"),
            public_ip: Some("10.0.0.7".parse().unwrap()),
            hostnames: vec!["csgo1.example.com".into()],
            started_at: None,
            last_status: TaskStatus::Running,
            desired_status: TaskStatus::Running,
            cpu: Some("2048".into()),
            memory: Some("4096".into()),
            overrides: TaskOverrides::default(),
            stop_code: None,
            stopped_reason: None,
            stopping_at: None,
            stopped_at: None,
            server_ready: true,
            map: Some("de_dust2".into()),
            players: Some(3),
            max_players: Some(10),
            bots: Some(0),
        };

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["taskArn"], "task/1");
        assert_eq!(json["publicIp"], "10.0.0.7");
        assert_eq!(json["serverReady"], true);
        assert_eq!(json["lastStatus"], "RUNNING");
        assert_eq!(json["maxPlayers"], 10);
        assert!(json["stoppedAt"].is_null());
    }
}
