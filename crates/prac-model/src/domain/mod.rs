mod kv;
pub use kv::KeyValue;

mod task_env;
pub use task_env::TaskEnv;

mod task_ref;
pub use task_ref::TaskRef;

mod task_status;
pub use task_status::TaskStatus;

mod overrides;
pub use overrides::{ContainerOverride, TaskOverrides};

mod compute_task;
pub use compute_task::{ComputeTask, ResourceSpec};

mod hostname;
pub use hostname::{DEFAULT_TTL, HostnameRecord, RecordType};

mod retry;
pub use retry::RetryMessage;

mod start;
pub use start::ServerStartRequest;

mod status;
pub use status::{CompositeStatus, format_timestamp};

/// Environment variable that turns a server task into a refresh-only image update.
pub const UPDATE_ONLY_ENV: &str = "UPDATE_ONLY";
