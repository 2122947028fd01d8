use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resources::TimingMode;
use crate::utils::{SimError, DEFAULT_TIME_STEP, GRAVITY, MAX_TIMESTEP, MIN_TIMESTEP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed step in seconds
    pub time_step: f32,
    pub gravity: Vector3<f32>,
    pub timing: TimingMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            gravity: Vector3::new(0.0, -GRAVITY, 0.0),
            timing: TimingMode::Simulated,
        }
    }
}

impl PhysicsConfig {
    pub fn step_duration(&self) -> Duration {
        Duration::from_secs_f32(self.time_step)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(MIN_TIMESTEP..=MAX_TIMESTEP).contains(&self.time_step) {
            return Err(SimError::InvalidConfig(format!(
                "time_step {} outside [{}, {}]",
                self.time_step, MIN_TIMESTEP, MAX_TIMESTEP
            )));
        }
        Ok(())
    }
}
