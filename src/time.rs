//! Conversions between wall-clock time and the 48-bit millisecond timestamp field.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The largest value the 48-bit timestamp field can hold (year 10889).
pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// Converts a [`SystemTime`] to Unix milliseconds, discarding sub-millisecond precision.
///
/// No range check happens here. Instants before the Unix epoch map to zero.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_micros(1_617_634_303_663_999);
/// assert_eq!(uulid::timestamp(t), 1_617_634_303_663);
/// ```
pub fn timestamp(t: SystemTime) -> u64 {
    let elapsed = t.duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Converts Unix milliseconds, as returned by [`timestamp`], to a [`SystemTime`].
pub fn time(ms: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(ms)
}

/// Returns the latest instant representable by a UULID.
pub fn max_time() -> SystemTime {
    time(MAX_TIMESTAMP)
}
