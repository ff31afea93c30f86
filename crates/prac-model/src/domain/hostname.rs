use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// TTL applied to every record binding a hostname to a server.
pub const DEFAULT_TTL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    A,
}

/// DNS binding of a fully-qualified name to a running task's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameRecord {
    pub zone: String,
    pub name: String,
    pub address: IpAddr,
    pub ttl: u32,
    pub record_type: RecordType,
}

impl HostnameRecord {
    /// `A` record with the fixed TTL.
    pub fn a(zone: impl Into<String>, name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            address,
            ttl: DEFAULT_TTL,
            record_type: RecordType::A,
        }
    }

    /// Compare names the way an authoritative directory does: case-insensitive, trailing dot optional.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name
            .trim_end_matches('.')
            .eq_ignore_ascii_case(other.trim_end_matches('.'))
    }
}
