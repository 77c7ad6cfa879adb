use embassy_time::Instant;

/// Monotonic time source.
///
/// Everything that gates on time takes a `Clock` so the dispatch loop can run
/// against the system tick on target and against a manual clock in tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the `embassy-time` driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
