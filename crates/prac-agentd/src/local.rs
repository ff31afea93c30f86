use std::net::IpAddr;
use std::time::Duration;

use prac_core::memory::MemoryFleet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Give every provisioning task `address` once it has waited `delay`.
///
/// Stands in for the asynchronous network attachment of a hosted fleet.
pub async fn run_provisioner(
    fleet: MemoryFleet,
    address: IpAddr,
    delay: Duration,
    cancel: CancellationToken,
) {
    info!(%address, delay_ms = delay.as_millis() as u64, "local provisioner started");

    loop {
        let pending = fleet.unattached();

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        for task in pending {
            if let Err(e) = fleet.attach(&task, address) {
                warn!(task = %task, error = %e, "attach failed");
            }
        }
    }

    info!("local provisioner stopped");
}
