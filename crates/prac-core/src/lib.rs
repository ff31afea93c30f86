pub mod error;
pub use error::CoreError;

pub mod config;
pub use config::{EnvSettings, FleetConfig, HostnameConfig, PracConfig, ProbeConfig, VersionParams};

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod fleet;
pub use fleet::{FleetControlPlane, RunTask};

mod dns;
pub use dns::DnsDirectory;

mod queue;
pub use queue::{MessageQueue, RetrySource};

mod params;
pub use params::ParameterStore;

pub mod lifecycle;
pub use lifecycle::LifecycleController;

pub mod resolver;
pub use resolver::{HostnameResolver, Resolution, ResolutionState, run_worker};

pub mod status;
pub use status::{QueryProbe, ServerProbe, StatusAggregator};

pub mod memory;
