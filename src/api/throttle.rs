// src/api/throttle.rs
//! Request pacing.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum gap between the starts of consecutive requests.
///
/// A single slot: each caller reserves the next start time under the lock,
/// then sleeps outside it.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may start and records its start time.
    pub async fn acquire(&self) {
        let wait = {
            let mut last_start = self.last_start.lock();
            let now = Instant::now();
            let start = match *last_start {
                Some(previous) => std::cmp::max(now, previous + self.min_interval),
                None => now,
            };
            *last_start = Some(start);
            start - now
        };

        if !wait.is_zero() {
            log::debug!("Throttling request for {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
