//! Query time windows.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A closed `[from_ms, to_ms]` range in milliseconds since the Unix epoch.
///
/// Every Glowroot query in one collection cycle uses the same window so that
/// all values of a cycle describe the same period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub from_ms: u64,
    pub to_ms: u64,
}

impl TimeWindow {
    /// The window of the given length ending at `now_ms`.
    ///
    /// `from_ms` saturates at zero.
    pub fn ending_at(now_ms: u64, length: Duration) -> Self {
        let length_ms = u64::try_from(length.as_millis()).unwrap_or(u64::MAX);
        Self {
            from_ms: now_ms.saturating_sub(length_ms),
            to_ms: now_ms,
        }
    }

    /// The window of the given length ending at the current wall-clock time.
    pub fn ending_now(length: Duration) -> Self {
        Self::ending_at(current_timestamp_ms(), length)
    }

    /// Length of the window.
    pub fn length(&self) -> Duration {
        Duration::from_millis(self.to_ms - self.from_ms)
    }
}

/// Current timestamp in milliseconds since the Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_ends_at_now() {
        let window = TimeWindow::ending_at(1_703_160_000_000, Duration::from_secs(5 * 60));
        assert_eq!(window.to_ms, 1_703_160_000_000);
        assert_eq!(window.from_ms, 1_703_159_700_000);
        assert_eq!(window.length(), Duration::from_secs(300));
    }

    #[test]
    fn window_saturates_at_epoch() {
        let window = TimeWindow::ending_at(1_000, Duration::from_secs(60));
        assert_eq!(window.from_ms, 0);
        assert_eq!(window.to_ms, 1_000);
    }

    #[test]
    fn ending_now_is_recent() {
        let before = current_timestamp_ms();
        let window = TimeWindow::ending_now(Duration::from_secs(1));
        assert!(window.to_ms >= before);
        assert_eq!(window.to_ms - window.from_ms, 1_000);
    }
}
