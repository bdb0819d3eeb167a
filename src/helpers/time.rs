use chrono::Utc;

/// Current wall-clock time as unix seconds
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}
