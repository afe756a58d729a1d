//! Sliding-window request budget shared by every HTTP call site.
//!
//! One [`RateLimiter`] is created at startup and handed out behind an
//! `Arc`, so listing fetches, article-body fetches, extraction retries,
//! and news API calls all draw down the same budget. `acquire` never
//! rejects a caller; over budget it parks the task until the window
//! slides.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    stamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Budget of `capacity` requests per `window`. A zero capacity is
    /// treated as one.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            window,
            stamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Budget of `capacity` requests per rolling minute.
    pub fn per_minute(capacity: usize) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    /// Wait until a request slot is free, then claim it.
    ///
    /// Slots are reclaimed as their timestamps age out of the window: a
    /// burst of `capacity` requests is admitted immediately, and the next
    /// caller sleeps out the remainder of the oldest stamp's window.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut stamps = self.stamps.lock().await;
                let now = Instant::now();
                while stamps
                    .front()
                    .is_some_and(|stamp| now.duration_since(*stamp) >= self.window)
                {
                    stamps.pop_front();
                }
                if stamps.len() < self.capacity {
                    stamps.push_back(now);
                    return;
                }
                let oldest = stamps[0];
                self.window.saturating_sub(now.duration_since(oldest))
            };
            debug!(?wait, "request budget exhausted, waiting for window to slide");
            sleep(wait).await;
        }
    }
}
