//! Wire names of the capability tags.

pub const METRICS_STORE: &str = "METRICS_STORE";
pub const OBJECT_STORE: &str = "OBJECT_STORE";
pub const CONFIGURATION_STORE: &str = "CONFIGURATION_STORE";
pub const REMOTE_JUDGE: &str = "REMOTE_JUDGE";
