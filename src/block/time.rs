use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time in milliseconds since the Unix epoch.
/// 
/// Returns 0 if the system clock is set before the epoch.
pub fn timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}
