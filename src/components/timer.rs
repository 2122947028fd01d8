use std::time::Duration;

use crate::resources::Clock;

/// Measures time since it was last reset.
///
/// Timers only store an epoch. Any number can share one clock and reset
/// independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownTimer {
    epoch: Duration,
}

impl CooldownTimer {
    /// A timer whose epoch is the clock's current time
    pub fn started(clock: &dyn Clock) -> Self {
        Self { epoch: clock.now() }
    }

    pub fn reset(&mut self, clock: &dyn Clock) {
        self.epoch = clock.now();
    }

    /// Never negative, even if the clock was swapped for one that is behind.
    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        clock.now().saturating_sub(self.epoch)
    }

    pub fn elapsed_secs(&self, clock: &dyn Clock) -> f32 {
        self.elapsed(clock).as_secs_f32()
    }

    /// Strictly past `threshold` since the last reset
    pub fn exceeded(&self, clock: &dyn Clock, threshold: Duration) -> bool {
        self.elapsed(clock) > threshold
    }
}
