use nalgebra::Vector3;
use std::time::Duration;

use crate::components::{ActorId, CooldownTimer};
use crate::resources::Clock;
use crate::scene::layout::{goal_event_slot, GOAL_EVENT_ROWS};
use crate::scene::{Scene, SceneError};

const RESTORE_AFTER: Duration = Duration::from_secs(2);

/// Push given to decoration `index` of both rows when a goal is scored
pub const GOAL_IMPULSES: [Vector3<f32>; GOAL_EVENT_ROWS] = [
    Vector3::new(0.0, 10_000.0, 0.0),
    Vector3::new(-2000.0, 10_000.0, 0.0),
    Vector3::new(2000.0, 10_000.0, 0.0),
    Vector3::new(-5000.0, 10_000.0, 0.0),
    Vector3::new(0.0, 10_000.0, 0.0),
];

/// Blocks beside the goal that leap on every goal and fall back into their
/// rows 2 s later.
#[derive(Debug, Clone)]
pub struct GoalCelebration {
    rows: [[ActorId; GOAL_EVENT_ROWS]; 2],
    timer: CooldownTimer,
    celebrations: u32,
}

impl GoalCelebration {
    pub fn new(rows: [[ActorId; GOAL_EVENT_ROWS]; 2], clock: &dyn Clock) -> Self {
        Self {
            rows,
            timer: CooldownTimer::started(clock),
            celebrations: 0,
        }
    }

    pub fn rows(&self) -> &[[ActorId; GOAL_EVENT_ROWS]; 2] {
        &self.rows
    }

    pub fn celebrations(&self) -> u32 {
        self.celebrations
    }

    /// Launches both rows while the goal flag is up.
    pub fn react(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if !scene.events().goal() {
            return Ok(());
        }
        for row in self.rows {
            for (id, impulse) in row.into_iter().zip(GOAL_IMPULSES) {
                scene.dynamic(id)?.add_force(impulse)?;
            }
        }
        self.timer.reset(scene.clock());
        self.celebrations += 1;
        Ok(())
    }

    /// Puts every block back in its slot once the celebration has settled.
    pub fn restore(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if !self.timer.exceeded(scene.clock(), RESTORE_AFTER) {
            return Ok(());
        }
        for (side, row) in self.rows.iter().enumerate() {
            for (index, &id) in row.iter().enumerate() {
                scene.dynamic(id)?.reset_to(goal_event_slot(side, index))?;
            }
        }
        Ok(())
    }
}
