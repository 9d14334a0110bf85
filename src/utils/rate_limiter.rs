use governor::{Quota, RateLimiter as GovernorRateLimiter};
use nonzero_ext::*;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

type DirectLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate limiter for API requests
pub struct RateLimiter {
    limiter: Option<DirectLimiter>,
    delay: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter with a fixed delay before every request
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            limiter: None,
            delay,
        }
    }

    /// Additionally cap throughput at `requests_per_minute`
    pub fn with_quota_per_minute(mut self, requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(nonzero!(1u32));
        self.limiter = Some(GovernorRateLimiter::direct(Quota::per_minute(per_minute)));
        self
    }

    /// Wait until a request is allowed
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if let Some(limiter) = &self.limiter {
            while limiter.check().is_err() {
                sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
