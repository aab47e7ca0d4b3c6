//! Outbound request pacing around governor.
//!
//! All three data sources share one pacer so a tick with many candidates
//! stays under the public APIs' rate limits.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::debug;

/// Shared token bucket for outbound HTTP calls.
pub struct RequestPacer {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: u32,
}

impl RequestPacer {
    /// Create a pacer allowing `requests_per_second` calls; zero falls back to one.
    pub fn new(requests_per_second: u32) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
            requests_per_second: per_second.get(),
        }
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        if self.limiter.check().is_err() {
            debug!(
                "Request budget of {}/s exhausted, waiting",
                self.requests_per_second
            );
            self.limiter.until_ready().await;
        }
    }

    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_zero_quota_falls_back() {
        let pacer = RequestPacer::new(0);
        assert_eq!(pacer.requests_per_second(), 1);
    }

    #[tokio::test]
    async fn test_burst_within_quota_is_immediate() {
        let pacer = RequestPacer::new(10);
        let start = Instant::now();

        for _ in 0..5 {
            pacer.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
