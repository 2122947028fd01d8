use std::time::Duration;

use crate::components::{CooldownTimer, JointId};
use crate::resources::Clock;
use crate::scene::{Scene, SceneError};

const OPEN_AFTER: Duration = Duration::from_secs(4);
const CLOSE_AFTER: Duration = Duration::from_secs(7);

/// Hinge drive while opening and closing, rad/s
pub const OPEN_DRIVE: f32 = -1.0;
pub const CLOSE_DRIVE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPhase {
    Closed,
    Opening,
}

/// Opens the drawbridge door 4 s into each cycle and closes it at 7 s.
#[derive(Debug, Clone)]
pub struct DoorCycle {
    hinge: JointId,
    timer: CooldownTimer,
    phase: DoorPhase,
}

impl DoorCycle {
    pub fn new(hinge: JointId, clock: &dyn Clock) -> Self {
        Self {
            hinge,
            timer: CooldownTimer::started(clock),
            phase: DoorPhase::Closed,
        }
    }

    pub fn hinge(&self) -> JointId {
        self.hinge
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    /// Time into the current cycle
    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        self.timer.elapsed(clock)
    }

    /// Advances the cycle, returning a new drive velocity when one is due.
    pub fn poll(&mut self, clock: &dyn Clock) -> Option<f32> {
        match self.phase {
            DoorPhase::Closed if self.timer.exceeded(clock, OPEN_AFTER) => {
                self.phase = DoorPhase::Opening;
                Some(OPEN_DRIVE)
            }
            DoorPhase::Opening if self.timer.exceeded(clock, CLOSE_AFTER) => {
                self.phase = DoorPhase::Closed;
                self.timer.reset(clock);
                Some(CLOSE_DRIVE)
            }
            _ => None,
        }
    }

    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if let Some(drive) = self.poll(scene.clock()) {
            scene.set_joint_drive(self.hinge, drive)?;
        }
        Ok(())
    }
}
