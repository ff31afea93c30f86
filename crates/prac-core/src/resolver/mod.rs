//! Binding a hostname to a task once its address is known.
//!
//! Network attachment has no push notification, so every retry message is one poll: bind the name if the address is there, otherwise put the identical message back until the budget embedded in its `start_time` runs out.

mod worker;
pub use worker::run_worker;

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use prac_model::{HostnameRecord, RetryMessage};
use tracing::{debug, info, instrument, warn};

use crate::clock::Clock;
use crate::config::{FleetConfig, HostnameConfig};
use crate::dns::DnsDirectory;
use crate::error::CoreError;
use crate::fleet::FleetControlPlane;
use crate::queue::MessageQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Pending,
    Resolved,
    Expired,
}

impl ResolutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionState::Pending => "pending",
            ResolutionState::Resolved => "resolved",
            ResolutionState::Expired => "expired",
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Record created.
    Resolved(HostnameRecord),
    /// No address yet; the unchanged message was sent again.
    Requeued { elapsed: Duration },
    /// No address and the budget is spent; the message was dropped.
    Expired { elapsed: Duration },
}

impl Resolution {
    pub fn state(&self) -> ResolutionState {
        match self {
            Resolution::Resolved(_) => ResolutionState::Resolved,
            Resolution::Requeued { .. } => ResolutionState::Pending,
            Resolution::Expired { .. } => ResolutionState::Expired,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(record) => Some(&record.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Bind(IpAddr),
    Requeue,
    Expire,
}

/// The budget is inclusive: a message exactly `budget` old is still requeued.
fn next_step(address: Option<IpAddr>, elapsed: Duration, budget: Duration) -> Step {
    match address {
        Some(address) => Step::Bind(address),
        None if elapsed <= budget => Step::Requeue,
        None => Step::Expire,
    }
}

pub struct HostnameResolver {
    fleet_config: FleetConfig,
    hostname: HostnameConfig,
    fleet: Arc<dyn FleetControlPlane>,
    dns: Arc<dyn DnsDirectory>,
    queue: Arc<dyn MessageQueue>,
    clock: Arc<dyn Clock>,
}

impl HostnameResolver {
    pub fn new(
        fleet_config: FleetConfig,
        hostname: HostnameConfig,
        fleet: Arc<dyn FleetControlPlane>,
        dns: Arc<dyn DnsDirectory>,
        queue: Arc<dyn MessageQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fleet_config,
            hostname,
            fleet,
            dns,
            queue,
            clock,
        }
    }

    pub fn config(&self) -> &HostnameConfig {
        &self.hostname
    }

    /// `true` once `message` is older than the resolution budget.
    pub fn is_expired(&self, message: &RetryMessage) -> bool {
        message.elapsed(self.clock.now()) > self.hostname.budget
    }

    /// Process one delivery of `message`.
    ///
    /// The running count is read separately from the record creation, so two overlapping starts can end up with the same index.
    #[instrument(level = "debug", skip_all, fields(task = %message.task_ref))]
    pub async fn handle(&self, message: &RetryMessage) -> Result<Resolution, CoreError> {
        let cluster = &self.fleet_config.cluster;
        let address = self.fleet.task_address(cluster, &message.task_ref).await?;
        let elapsed = message.elapsed(self.clock.now());

        match next_step(address, elapsed, self.hostname.budget) {
            Step::Bind(address) => {
                let index = self
                    .fleet
                    .running_count(cluster, &self.fleet_config.task_family)
                    .await?;
                let record =
                    HostnameRecord::a(&self.hostname.zone, self.hostname.hostname(index), address);
                self.dns.create_record(record.clone()).await?;
                info!(hostname = %record.name, %address, "RESOLVED");
                Ok(Resolution::Resolved(record))
            }
            Step::Requeue => {
                self.queue.send(&self.hostname.queue, message).await?;
                debug!(elapsed_s = elapsed.as_secs(), "REQUEUED");
                Ok(Resolution::Requeued { elapsed })
            }
            Step::Expire => {
                warn!(elapsed_s = elapsed.as_secs(), "EXPIRED");
                Ok(Resolution::Expired { elapsed })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use prac_model::{TaskEnv, TaskRef};

    use super::*;
    use crate::clock::ManualClock;
    use crate::memory::{MemoryDns, MemoryFleet, MemoryQueue};

    pub(crate) const T0: u64 = 1_700_000_000;

    pub(crate) fn fleet_config() -> FleetConfig {
        FleetConfig {
            cluster: "prac".into(),
            task_definition: "csgo-server:1".into(),
            update_task_definition: "csgo-server:1".into(),
            task_family: "csgo-server".into(),
            subnets: vec!["subnet-a".into()],
            security_groups: vec![],
            container_name: "csgo".into(),
        }
    }

    pub(crate) fn hostname_config() -> HostnameConfig {
        HostnameConfig {
            zone: "Z1".into(),
            domain: "example.com".into(),
            prefix: "csgo".into(),
            queue: "get-hostname".into(),
            budget: Duration::from_secs(600),
            redelivery_delay: Duration::from_millis(5),
        }
    }

    pub(crate) struct Fixture {
        pub fleet: MemoryFleet,
        pub dns: MemoryDns,
        pub queue: MemoryQueue,
        pub clock: Arc<ManualClock>,
        pub resolver: HostnameResolver,
    }

    pub(crate) fn fixture() -> Fixture {
        let fleet = MemoryFleet::new();
        let dns = MemoryDns::new();
        let queue = MemoryQueue::new("get-hostname");
        let clock = Arc::new(ManualClock::new(UNIX_EPOCH + Duration::from_secs(T0)));
        let resolver = HostnameResolver::new(
            fleet_config(),
            hostname_config(),
            Arc::new(fleet.clone()),
            Arc::new(dns.clone()),
            Arc::new(queue.clone()),
            clock.clone(),
        );
        Fixture {
            fleet,
            dns,
            queue,
            clock,
            resolver,
        }
    }

    pub(crate) async fn launch(fleet: &MemoryFleet) -> TaskRef {
        let cfg = fleet_config();
        let request = cfg.run_request(&cfg.task_definition, TaskEnv::new());
        fleet.run_task(request).await.unwrap().remove(0).task_ref
    }

    fn started_at(at: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(at)
    }

    #[test]
    fn step_boundaries() {
        let budget = Duration::from_secs(600);
        let addr: IpAddr = "10.0.0.1".parse().unwrap();

        assert_eq!(next_step(None, Duration::from_secs(599), budget), Step::Requeue);
        assert_eq!(next_step(None, Duration::from_secs(600), budget), Step::Requeue);
        assert_eq!(next_step(None, Duration::from_secs(601), budget), Step::Expire);
        assert_eq!(next_step(Some(addr), Duration::from_secs(10_000), budget), Step::Bind(addr));
    }

    #[tokio::test]
    async fn unattached_task_at_599s_is_requeued_unchanged() {
        let fx = fixture();
        let task = launch(&fx.fleet).await;
        let message = RetryMessage::new(task, started_at(T0 - 599));

        let outcome = fx.resolver.handle(&message).await.unwrap();

        assert_eq!(outcome.state(), ResolutionState::Pending);
        assert_eq!(fx.queue.pending(), vec![message]);
        assert!(fx.dns.records().is_empty());
    }

    #[tokio::test]
    async fn unattached_task_at_601s_is_dropped() {
        let fx = fixture();
        let task = launch(&fx.fleet).await;
        let message = RetryMessage::new(task, started_at(T0 - 601));

        let outcome = fx.resolver.handle(&message).await.unwrap();

        assert_eq!(outcome, Resolution::Expired { elapsed: Duration::from_secs(601) });
        assert!(fx.queue.is_empty());
        assert!(fx.dns.records().is_empty());
        assert!(fx.resolver.is_expired(&message));
    }

    #[tokio::test]
    async fn attached_task_binds_hostname_to_its_address() {
        let fx = fixture();
        let task = launch(&fx.fleet).await;
        let addr: IpAddr = "54.1.2.3".parse().unwrap();
        fx.fleet.attach(&task, addr).unwrap();

        let outcome = fx
            .resolver
            .handle(&RetryMessage::new(task, started_at(T0 - 30)))
            .await
            .unwrap();

        assert_eq!(outcome.hostname(), Some("csgo1.example.com"));
        let records = fx.dns.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, addr);
        assert_eq!(records[0].zone, "Z1");
        assert_eq!(records[0].ttl, prac_model::DEFAULT_TTL);
        assert!(fx.queue.is_empty());
    }

    #[tokio::test]
    async fn hostname_index_follows_running_count() {
        let fx = fixture();
        let first = launch(&fx.fleet).await;
        let second = launch(&fx.fleet).await;
        let _third = launch(&fx.fleet).await;
        fx.fleet.attach(&second, "54.0.0.2".parse().unwrap()).unwrap();
        fx.fleet.stop_task("prac", &first).await.unwrap();

        let outcome = fx
            .resolver
            .handle(&RetryMessage::new(second, started_at(T0)))
            .await
            .unwrap();

        // `third` is still desired RUNNING, so two tasks are counted.
        assert_eq!(outcome.hostname(), Some("csgo2.example.com"));
    }

    #[tokio::test]
    async fn late_attachment_is_not_subject_to_the_budget() {
        let fx = fixture();
        let task = launch(&fx.fleet).await;
        fx.fleet.attach(&task, "54.0.0.9".parse().unwrap()).unwrap();
        fx.clock.advance(Duration::from_secs(3_600));

        let outcome = fx
            .resolver
            .handle(&RetryMessage::new(task, started_at(T0)))
            .await
            .unwrap();
        assert_eq!(outcome.state(), ResolutionState::Resolved);
    }

    #[tokio::test]
    async fn queue_failure_is_surfaced() {
        let fx = fixture();
        let task = launch(&fx.fleet).await;
        fx.queue.close();

        let err = fx
            .resolver
            .handle(&RetryMessage::new(task, started_at(T0)))
            .await
            .unwrap_err();
        assert!(err.is_collaborator());
    }
}
