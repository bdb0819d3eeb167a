use std::time::Duration;

pub const BAUD_RATE: u32 = 9600;
pub const UNIT_ID: u8 = 1;
pub const TIMEOUT: Duration = Duration::from_secs(2);
