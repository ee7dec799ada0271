//! Platform-agnostic time types.
//!
//! On native platforms the monotonic clock is `std::time::Instant`; on WASM it is re-exported from
//! `web-time`, which uses the browser's `Performance` API. Wall-clock timestamps, which are only
//! used for rendering messages, come from `chrono`.
//!
//! All code in this crate should use these types instead of `std::time` directly.

#[cfg(not(target_arch = "wasm32"))]
pub(crate) use std::time::Duration;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

use chrono::Local;
use chrono::NaiveDateTime;
#[cfg(target_arch = "wasm32")]
pub(crate) use web_time::Duration;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;

use crate::TimerError;

/// The current local time, as rendered in default messages and error text.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// ISO-8601 with second precision, e.g. `2024-05-01T13:37:00`.
pub(crate) fn format_seconds(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// ISO-8601 with microsecond precision, e.g. `2024-05-01T13:37:00.123456`.
pub(crate) fn format_micros(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Blocks the calling thread for `seconds` seconds.
///
/// Negative, infinite and NaN durations are rejected with [`TimerError::InvalidSleep`] instead of
/// sleeping.
pub fn sleep(seconds: f64) -> Result<(), TimerError> {
    let duration =
        Duration::try_from_secs_f64(seconds).map_err(|_| TimerError::InvalidSleep { seconds })?;
    std::thread::sleep(duration);
    Ok(())
}
