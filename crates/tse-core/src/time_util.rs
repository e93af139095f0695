//! Wall-clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// 13-digit cache-buster attached to streaming handshake requests.
///
/// Millisecond epoch time has 13 digits until the year 2286; the value is
/// padded or cut to exactly 13 characters so the wire format never drifts.
pub fn cache_buster() -> String {
    let mut s = now_ms().to_string();
    while s.len() < 13 {
        s.push('0');
    }
    s.truncate(13);
    s
}
