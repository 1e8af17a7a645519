//! TMDB API request spacer.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Slot-reserving rate limiter for TMDB API.
///
/// TMDB enforces roughly 40 requests per second. Each caller reserves the
/// next free slot under a short lock and then sleeps outside of it, so a
/// burst of concurrent requests is spread out at `min_interval` spacing
/// instead of queueing one sleeper behind another.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum interval between requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Mutex<Option<Instant>>,
}

impl TmdbRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Creates a new rate limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until this caller's reserved slot arrives.
    pub async fn wait(&self) {
        let delay = self.reserve(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Reserves the next slot at or after `now` and returns how long the
    /// caller has to wait for it.
    fn reserve(&self, now: Instant) -> Duration {
        let mut next = self.next_slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = match *next {
            Some(reserved) if reserved > now => reserved,
            _ => now,
        };
        *next = Some(slot.checked_add(self.min_interval).unwrap_or(slot));
        slot.saturating_duration_since(now)
    }
}
