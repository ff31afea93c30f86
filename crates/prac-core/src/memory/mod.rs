//! In-memory collaborators for local runs and tests.
//!
//! Listing order is insertion order, mirroring what the hosted services report for a single-server deployment.

mod dns;
mod fleet;
mod params;
mod queue;

pub use dns::MemoryDns;
pub use fleet::MemoryFleet;
pub use params::MemoryParameters;
pub use queue::MemoryQueue;
