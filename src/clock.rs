//! Wall-clock and sleep source for the collector.

use std::time::Duration;

use async_trait::async_trait;
use glowwatch_types::current_timestamp_ms;

/// Where the collector reads the time and waits between cycles.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> u64;

    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The system clock, sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn epoch_millis(&self) -> u64 {
        current_timestamp_ms()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.epoch_millis() > 1_577_836_800_000);
    }

    #[tokio::test(start_paused = true)]
    async fn system_clock_sleeps_on_tokio_time() {
        let start = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_secs(30)).await;
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
