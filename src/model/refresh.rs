use std::time::{Duration, Instant};

/// Interval between countdown refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Cooperative repeating timer polled from the UI frame loop.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Instant,
}

impl RefreshTimer {
    /// First tick is due one interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Returns true when the timer fired. Missed ticks collapse into one.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }

    pub fn until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
