use std::net::IpAddr;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use prac_model::HostnameRecord;

use crate::dns::DnsDirectory;
use crate::error::CoreError;

/// DNS directory keeping its records in process memory.
#[derive(Clone, Default)]
pub struct MemoryDns {
    records: Arc<RwLock<Vec<HostnameRecord>>>,
}

impl MemoryDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<HostnameRecord> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl DnsDirectory for MemoryDns {
    async fn create_record(&self, record: HostnameRecord) -> Result<(), CoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records
            .iter()
            .any(|r| r.zone == record.zone && r.name_matches(&record.name))
        {
            return Err(CoreError::Dns(format!("record {} already exists", record.name)));
        }
        records.push(record);
        Ok(())
    }

    async fn delete_record(&self, zone: &str, name: &str, address: IpAddr) -> Result<(), CoreError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let idx = records
            .iter()
            .position(|r| r.zone == zone && r.name_matches(name) && r.address == address)
            .ok_or_else(|| CoreError::Dns(format!("record {name} -> {address} not found")))?;
        records.remove(idx);
        Ok(())
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<HostnameRecord>, CoreError> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.zone == zone)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reverse_lookup_matches_address_only() {
        let dns = MemoryDns::new();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        dns.create_record(HostnameRecord::a("Z1", "csgo1.example.com", a)).await.unwrap();
        dns.create_record(HostnameRecord::a("Z1", "csgo2.example.com", b)).await.unwrap();
        dns.create_record(HostnameRecord::a("Z2", "other.example.org", a)).await.unwrap();

        assert_eq!(dns.hostnames_for("Z1", a).await.unwrap(), vec!["csgo1.example.com"]);
        assert_eq!(dns.list_records("Z1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let dns = MemoryDns::new();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        dns.create_record(HostnameRecord::a("Z1", "csgo1.example.com", a)).await.unwrap();

        let err = dns
            .create_record(HostnameRecord::a("Z1", "CSGO1.example.com.", a))
            .await
            .unwrap_err();
        assert!(err.is_collaborator());
    }

    #[tokio::test]
    async fn delete_requires_exact_binding() {
        let dns = MemoryDns::new();
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        dns.create_record(HostnameRecord::a("Z1", "csgo1.example.com", a)).await.unwrap();

        assert!(dns
            .delete_record("Z1", "csgo1.example.com", "10.0.0.9".parse().unwrap())
            .await
            .is_err());
        dns.delete_record("Z1", "csgo1.example.com", a).await.unwrap();
        assert!(dns.records().is_empty());
    }
}
