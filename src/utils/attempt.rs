use std::time::Duration;

use tokio::time::sleep;
use tokio::time::Instant;

/// Bounded retry schedule: a total duration and a fixed delay between
/// attempts.
///
/// Time is read from `tokio::time`, so a paused test runtime drives the
/// schedule without real wall-clock delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptStrategy {
    /// Total duration of the whole schedule
    pub total: Duration,

    /// Interval between the start of two attempts
    pub delay: Duration,

    /// Minimum number of attempts, made even after `total` has elapsed
    pub min: usize,
}

impl AttemptStrategy {
    pub const fn new(
        total: Duration,
        delay: Duration,
    ) -> Self {
        Self { total, delay, min: 0 }
    }

    pub const fn with_min(
        mut self,
        min: usize,
    ) -> Self {
        self.min = min;
        self
    }

    /// Begins a new sequence of attempts. The deadline starts counting now.
    pub fn start(&self) -> Attempt {
        let now = Instant::now();
        Attempt {
            strategy: *self,
            last: now,
            end: now + self.total,
            force: true,
            count: 0,
        }
    }
}

/// Cursor over an [`AttemptStrategy`].
///
/// Owned by a single caller; not meant to be shared between tasks.
#[derive(Debug)]
pub struct Attempt {
    strategy: AttemptStrategy,
    last: Instant,
    end: Instant,
    force: bool,
    count: usize,
}

impl Attempt {
    /// Waits until the next attempt should be made and returns true, or
    /// returns false right away when the deadline has passed.
    ///
    /// The first call always returns true without waiting.
    pub async fn next(&mut self) -> bool {
        let mut now = Instant::now();
        let wait = self.next_sleep(now);
        if !self.force && now + wait >= self.end && self.strategy.min <= self.count {
            return false;
        }
        self.force = false;
        if !wait.is_zero() && self.count > 0 {
            sleep(wait).await;
            now = Instant::now();
        }
        self.count += 1;
        self.last = now;
        true
    }

    /// Reports whether another attempt is available, without waiting.
    ///
    /// When this returns true the following call to [`Attempt::next`] is
    /// guaranteed to return true as well, even if the deadline passes in
    /// between.
    pub fn has_next(&mut self) -> bool {
        if self.force || self.strategy.min > self.count {
            return true;
        }
        let now = Instant::now();
        if now + self.next_sleep(now) < self.end {
            self.force = true;
            return true;
        }
        false
    }

    /// Number of attempts made so far
    pub fn count(&self) -> usize {
        self.count
    }

    fn next_sleep(
        &self,
        now: Instant,
    ) -> Duration {
        self.strategy.delay.saturating_sub(now.saturating_duration_since(self.last))
    }
}
