//! Pacing policies for throttling provider requests.
//!
//! The public Nominatim instance allows at most 1 request per second,
//! enforced here as a fixed delay before every lookup. The policy is a
//! trait so tests can substitute [`NoDelay`] and run the resolver at
//! full speed.

use std::time::Duration;

/// A throttle applied before each external geocoding request.
#[async_trait::async_trait]
pub trait Pacing: Send + Sync {
    /// Suspends until the next request is allowed to proceed.
    async fn pause(&self);
}

/// Waits a fixed duration before every request.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Creates a policy that waits `delay` before each request.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl Pacing for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No throttling. For tests and self-hosted providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait::async_trait]
impl Pacing for NoDelay {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn fixed_delay_waits_at_least_the_configured_duration() {
        let policy = FixedDelay::new(Duration::from_millis(20));
        let start = Instant::now();
        policy.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn no_delay_returns_immediately() {
        let policy = NoDelay;
        let start = Instant::now();
        policy.pause().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
