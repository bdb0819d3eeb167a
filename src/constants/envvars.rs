pub const SNAP_COMMON: &str = "SNAP_COMMON";

pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const AC_PORT: &str = "AC_PORT";
pub const AGENT_ID: &str = "AGENT_ID";
pub const REPORT_URL: &str = "REPORT_URL";
pub const X_API_KEY: &str = "X_API_KEY";
pub const POLL_INTERVAL: &str = "POLL_INTERVAL";
pub const POLL_ROUNDTIME: &str = "POLL_ROUNDTIME";
pub const HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";
