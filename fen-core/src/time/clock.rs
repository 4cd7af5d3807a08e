//! Monotonic clock source.
//!
//! Wraps `std::time::Instant`, the steady high-resolution clock. Wall time is
//! never used for record timestamps; it would move backwards under NTP slew.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic nanosecond instant.
pub type Timestamp = Instant;

/// Current monotonic instant.
#[inline(always)]
pub fn now() -> Timestamp {
    Instant::now()
}

/// Sleep until `deadline` has passed. Returns immediately if the deadline is
/// already behind us.
pub fn sleep_until(deadline: Timestamp) {
    let current = Instant::now();
    if deadline > current {
        thread::sleep(deadline - current);
    }
}

/// Elapsed duration since `earlier`, saturating at zero.
#[inline]
pub fn since(earlier: Timestamp) -> Duration {
    earlier.elapsed()
}
