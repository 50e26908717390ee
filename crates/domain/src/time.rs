//! Time helpers.
//!
//! Reconnect cooldowns are measured on the monotonic clock, so stepping the
//! system clock (NTP corrections, manual changes) never stretches an outage.

use std::time::{Duration, Instant};

/// Return the current monotonic instant.
#[must_use]
pub fn now() -> Instant {
    Instant::now()
}

/// Time elapsed between `since` and `now`, zero when `now` is earlier.
#[must_use]
pub fn elapsed(since: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(since)
}
