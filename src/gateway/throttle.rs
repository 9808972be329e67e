//! Upstream Throttle
//!
//! Enforces a minimum spacing between outbound requests so bursts of cache
//! misses do not trip the upstream rate limit.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Minimum-interval gate shared by every upstream call.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    /// When the last request was released
    last_release: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_release: Mutex::new(None),
        }
    }

    /// Waits until at least `min_interval` has passed since the previous release.
    ///
    /// Waiters queue on the lock, so concurrent callers are released one
    /// interval apart. The first call never waits.
    pub async fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last_release = self.last_release.lock().await;
        if let Some(previous) = *last_release {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!(
                    "Throttling upstream request for {:?}",
                    ready_at - Instant::now()
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_release = Some(Instant::now());
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let throttle = Throttle::new(Duration::from_secs(5));
        let started = Instant::now();

        throttle.wait().await;

        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_second_call_is_spaced() {
        let throttle = Throttle::new(Duration::from_millis(150));

        throttle.wait().await;
        let started = Instant::now();
        throttle.wait().await;

        assert!(started.elapsed() >= Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let throttle = Throttle::new(Duration::ZERO);
        let started = Instant::now();

        for _ in 0..10 {
            throttle.wait().await;
        }

        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(throttle.min_interval().is_zero());
    }
}
