pub mod physics;
pub mod render;
pub mod rugby;
pub mod simulation;

pub use physics::PhysicsConfig;
pub use render::RenderConfig;
pub use rugby::RugbyConfig;
pub use simulation::SimulationConfig;
