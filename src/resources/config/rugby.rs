use serde::{Deserialize, Serialize};

use crate::utils::SimError;

/// Tuning for the rugby scene scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RugbyConfig {
    pub seed: u64,
    /// Catapult drive speed is drawn uniformly from `[min, max)`
    pub drive_speed_min: f32,
    pub drive_speed_max: f32,
    /// Oldest debris is removed past this count; `None` keeps every piece
    pub debris_capacity: Option<usize>,
    /// Sideways push on the catapult base
    pub move_force: f32,
}

impl Default for RugbyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            drive_speed_min: 19.0,
            drive_speed_max: 28.0,
            debris_capacity: Some(256),
            move_force: 100_000.0,
        }
    }
}

impl RugbyConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.drive_speed_min.is_finite()
            && self.drive_speed_max.is_finite()
            && self.drive_speed_min < self.drive_speed_max)
        {
            return Err(SimError::InvalidConfig(format!(
                "drive speed range [{}, {}) is empty",
                self.drive_speed_min, self.drive_speed_max
            )));
        }
        if self.debris_capacity == Some(0) {
            return Err(SimError::InvalidConfig(
                "debris_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
