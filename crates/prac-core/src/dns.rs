use std::net::IpAddr;

use async_trait::async_trait;
use prac_model::HostnameRecord;

use crate::error::CoreError;

/// Authoritative name service holding the hostname bindings.
#[async_trait]
pub trait DnsDirectory: Send + Sync + 'static {
    async fn create_record(&self, record: HostnameRecord) -> Result<(), CoreError>;

    /// Delete the A record `name -> address` in `zone`.
    async fn delete_record(&self, zone: &str, name: &str, address: IpAddr) -> Result<(), CoreError>;

    async fn list_records(&self, zone: &str) -> Result<Vec<HostnameRecord>, CoreError>;

    /// Reverse lookup: every name in `zone` bound to `address`, in listing order.
    async fn hostnames_for(&self, zone: &str, address: IpAddr) -> Result<Vec<String>, CoreError> {
        Ok(self
            .list_records(zone)
            .await?
            .into_iter()
            .filter(|r| r.address == address)
            .map(|r| r.name)
            .collect())
    }
}
