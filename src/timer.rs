use embassy_time::{Duration, Instant};

use crate::clock::Clock;

/// Non-blocking countdown.
///
/// A `Timer` never waits. Callers query [`Timer::is_complete`] once per
/// dispatch cycle and act when it reports `true`.
#[derive(Debug, Clone)]
pub struct Timer<C: Clock> {
    clock: C,
    start: Instant,
    duration: Duration,
}

impl<C: Clock> Timer<C> {
    /// Create a timer anchored at the current time.
    pub fn new(clock: C, duration: Duration) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            duration,
        }
    }

    /// Create a timer that is already complete.
    pub fn expired(clock: C) -> Self {
        Self::new(clock, Duration::from_ticks(0))
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed() >= self.duration
    }

    /// Re-anchor the start time, keeping the current duration.
    pub fn reset(&mut self) {
        self.start = self.clock.now();
    }

    /// Re-anchor the start time and replace the duration.
    pub fn reset_with(&mut self, duration: Duration) {
        self.duration = duration;
        self.reset();
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    pub fn remaining(&self) -> Duration {
        self.duration
            .checked_sub(self.elapsed())
            .unwrap_or(Duration::from_ticks(0))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
