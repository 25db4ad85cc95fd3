//! Fixed-interval polling.
//!
//! Every wait in an experiment is "sleep, ask again". `Poll` captures the
//! interval and an optional attempt ceiling so discovery and the sub-job
//! barrier share one loop.

use std::thread;
use std::time::Duration;
use tracing::trace;

/// The attempt ceiling was reached without the probe succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub attempts: u32,
}

/// Sleep-then-poll policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poll {
    interval: Duration,
    max_attempts: Option<u32>,
}

impl Poll {
    /// Poll at most `max_attempts` times.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }

    /// Poll until the probe succeeds.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Bounded when `max_attempts` is set, unbounded otherwise.
    pub fn with_limit(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Call `probe` until it returns `Some`, sleeping between attempts.
    ///
    /// `probe` receives the 1-based attempt number. There is no sleep before
    /// the first attempt or after the last one.
    pub fn until<T>(&self, mut probe: impl FnMut(u32) -> Option<T>) -> Result<T, Exhausted> {
        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            if let Some(value) = probe(attempt) {
                trace!(attempt, "poll satisfied");
                return Ok(value);
            }

            if let Some(max) = self.max_attempts {
                if attempt >= max {
                    return Err(Exhausted { attempts: attempt });
                }
            }

            trace!(attempt, interval_ms = self.interval.as_millis() as u64, "poll sleeping");
            thread::sleep(self.interval);
        }
    }
}
