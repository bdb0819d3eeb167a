use std::time::Duration;

pub const LOG_LEVEL: &str = "info";
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Upper bound for configured intervals and timeouts
pub const MAX_DURATION: Duration = Duration::from_secs(86_400);
pub const REPORT_PATH: &str = "/receive/airConditioner";
