//! Wall-clock access for cache expiry.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time.
///
/// Injected into caches so expiry can be tested without sleeping.
pub trait Clock: Send + Sync {
    /// Return the current time.
    fn now(&self) -> SystemTime;

    /// Return the current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64 {
        unix_millis(self.now())
    }
}

/// [`Clock`] backed by [`SystemTime::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Convert a timestamp to milliseconds since the Unix epoch.
///
/// Times before the epoch map to `0`; times beyond `u64::MAX` milliseconds
/// saturate.
#[must_use]
pub fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
