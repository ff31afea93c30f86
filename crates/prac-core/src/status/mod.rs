//! One aggregated view per running server task.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use prac_model::{CompositeStatus, ComputeTask, TaskStatus, format_timestamp};
use prac_query::{QueryClient, ServerProbeResult, Transport, UdpTransport};
use tracing::{debug, instrument};

use crate::config::{FleetConfig, HostnameConfig, ProbeConfig};
use crate::dns::DnsDirectory;
use crate::error::CoreError;
use crate::fleet::FleetControlPlane;

/// Live check of the game server behind an address; `None` means not ready.
#[async_trait]
pub trait ServerProbe: Send + Sync + 'static {
    async fn probe(&self, address: IpAddr) -> Option<ServerProbeResult>;
}

/// [`ServerProbe`] speaking A2S_INFO on the configured query port.
pub struct QueryProbe<T = UdpTransport> {
    client: QueryClient<T>,
    config: ProbeConfig,
}

impl QueryProbe<UdpTransport> {
    pub fn udp(config: ProbeConfig) -> Self {
        Self::new(QueryClient::udp(), config)
    }
}

impl<T: Transport> QueryProbe<T> {
    pub fn new(client: QueryClient<T>, config: ProbeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl<T: Transport> ServerProbe for QueryProbe<T> {
    async fn probe(&self, address: IpAddr) -> Option<ServerProbeResult> {
        self.client
            .query(address, self.config.port, self.config.timeout)
            .await
    }
}

pub struct StatusAggregator {
    fleet_config: FleetConfig,
    hostname: Option<HostnameConfig>,
    fleet: Arc<dyn FleetControlPlane>,
    dns: Arc<dyn DnsDirectory>,
    probe: Arc<dyn ServerProbe>,
}

impl StatusAggregator {
    pub fn new(
        fleet_config: FleetConfig,
        hostname: Option<HostnameConfig>,
        fleet: Arc<dyn FleetControlPlane>,
        dns: Arc<dyn DnsDirectory>,
        probe: Arc<dyn ServerProbe>,
    ) -> Self {
        Self {
            fleet_config,
            hostname,
            fleet,
            dns,
            probe,
        }
    }

    /// Status of every task whose desired status is RUNNING, in fleet listing order.
    ///
    /// An unreachable server only clears its probe fields; fleet and DNS failures abort the whole call.
    #[instrument(level = "debug", skip_all)]
    pub async fn get_status(&self) -> Result<Vec<CompositeStatus>, CoreError> {
        let cluster = &self.fleet_config.cluster;
        let refs = self
            .fleet
            .list_tasks(cluster, &self.fleet_config.task_family, TaskStatus::Running)
            .await?;
        if refs.is_empty() {
            return Ok(Vec::new());
        }

        let described = self.fleet.describe_tasks(cluster, &refs).await?;
        let mut out = Vec::with_capacity(refs.len());
        for task_ref in &refs {
            let Some(task) = described.iter().find(|t| &t.task_ref == task_ref) else {
                debug!(task = %task_ref, "listed task missing from description");
                continue;
            };
            out.push(self.compose(task).await?);
        }
        Ok(out)
    }

    async fn compose(&self, task: &ComputeTask) -> Result<CompositeStatus, CoreError> {
        let (hostnames, probe) = match task.address {
            Some(address) => {
                let hostnames = match &self.hostname {
                    Some(hostname) => self.dns.hostnames_for(&hostname.zone, address).await?,
                    None => Vec::new(),
                };
                (hostnames, self.probe.probe(address).await)
            }
            None => (Vec::new(), None),
        };
        debug!(task = %task.task_ref, ready = probe.is_some(), "task status composed");

        Ok(CompositeStatus {
            task_arn: task.task_ref.clone(),
            public_ip: task.address,
            hostnames,
            started_at: task.started_at.and_then(format_timestamp),
            last_status: task.last_status,
            desired_status: task.desired_status,
            cpu: task.resources.cpu.clone(),
            memory: task.resources.memory.clone(),
            overrides: task.overrides.clone(),
            stop_code: task.stop_code.clone(),
            stopped_reason: task.stopped_reason.clone(),
            stopping_at: task.stopping_at.and_then(format_timestamp),
            stopped_at: task.stopped_at.and_then(format_timestamp),
            server_ready: probe.as_ref().is_some_and(|p| p.ready),
            map: probe.as_ref().map(|p| p.map.clone()),
            players: probe.as_ref().map(|p| p.players),
            max_players: probe.as_ref().map(|p| p.max_players),
            bots: probe.as_ref().map(|p| p.bots),
        })
    }
}
