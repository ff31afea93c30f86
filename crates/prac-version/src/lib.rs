//! Keeping the server image in step with the upstream game release.

mod config;
pub use config::VersionConfig;

mod errors;
pub use errors::VersionError;

mod source;
pub use source::{SteamVersionSource, UpToDateCheck, UpstreamVersion};

mod check;
pub use check::{VersionChecker, VersionOutcome};
