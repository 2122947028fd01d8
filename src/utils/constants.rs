pub const GRAVITY: f32 = 9.81; // m/s^2

pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0; // s
pub const MAX_TIMESTEP: f32 = 1.0 / 10.0; // Maximum physics timestep
pub const MIN_TIMESTEP: f32 = 1.0 / 1000.0; // Minimum physics timestep

pub const DEFAULT_DENSITY: f32 = 1.0; // kg/m^3
