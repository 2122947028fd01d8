pub mod commands;
pub mod config;
mod time;

pub use commands::{Command, CommandQueue};
pub use config::{PhysicsConfig, RenderConfig, RugbyConfig, SimulationConfig};
pub use time::{Clock, ClockSource, MonotonicClock, SimulationClock, TimingMode};
