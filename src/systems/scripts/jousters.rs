use nalgebra::Vector3;
use std::time::Duration;

use crate::components::{ActorId, CooldownTimer};
use crate::resources::Clock;
use crate::scene::layout::joust_formation;
use crate::scene::{Scene, SceneError};

const REGROUP_AFTER: Duration = Duration::from_secs(2);

/// Per-step charge of each team. Team one is slightly stronger.
pub const TEAM_ONE_CHARGE: Vector3<f32> = Vector3::new(0.0, 0.0, -101.0);
pub const TEAM_TWO_CHARGE: Vector3<f32> = Vector3::new(0.0, 0.0, 100.0);

/// Two lines of jousters pushed at each other every step and snapped back
/// to their formation every 2 s.
#[derive(Debug, Clone)]
pub struct JoustTeams {
    teams: [Vec<ActorId>; 2],
    timer: CooldownTimer,
    regroups: u32,
}

impl JoustTeams {
    pub fn new(team_one: Vec<ActorId>, team_two: Vec<ActorId>, clock: &dyn Clock) -> Self {
        Self {
            teams: [team_one, team_two],
            timer: CooldownTimer::started(clock),
            regroups: 0,
        }
    }

    pub fn team(&self, team: usize) -> &[ActorId] {
        &self.teams[team]
    }

    pub fn regroups(&self) -> u32 {
        self.regroups
    }

    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        for (team, charge) in [(0, TEAM_ONE_CHARGE), (1, TEAM_TWO_CHARGE)] {
            for &id in &self.teams[team] {
                scene.dynamic(id)?.add_force(charge)?;
            }
        }

        if self.timer.exceeded(scene.clock(), REGROUP_AFTER) {
            for (team, members) in self.teams.iter().enumerate() {
                for (index, &id) in members.iter().enumerate() {
                    scene.dynamic(id)?.reset_to(joust_formation(team, index))?;
                }
            }
            self.timer.reset(scene.clock());
            self.regroups += 1;
        }
        Ok(())
    }
}
