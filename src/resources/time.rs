use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Monotonic time source read by cooldown timers
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock advanced explicitly by the fixed simulation step
#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    elapsed: Duration,
    ticks: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Duration {
        self.elapsed
    }
}

/// Wall-clock time since construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingMode {
    /// Timers follow simulated time; runs are reproducible
    #[default]
    Simulated,
    /// Timers follow the wall clock regardless of step rate
    Wall,
}

/// The clock a scene's timers read from
#[derive(Debug, Clone)]
pub enum ClockSource {
    Simulated(SimulationClock),
    Wall(MonotonicClock),
}

impl ClockSource {
    pub fn new(mode: TimingMode) -> Self {
        match mode {
            TimingMode::Simulated => ClockSource::Simulated(SimulationClock::new()),
            TimingMode::Wall => ClockSource::Wall(MonotonicClock::new()),
        }
    }

    /// Called once per completed step. Wall time advances on its own.
    pub fn advance(&mut self, dt: Duration) {
        if let ClockSource::Simulated(clock) = self {
            clock.advance(dt);
        }
    }
}

impl Clock for ClockSource {
    fn now(&self) -> Duration {
        match self {
            ClockSource::Simulated(clock) => clock.now(),
            ClockSource::Wall(clock) => clock.now(),
        }
    }
}
