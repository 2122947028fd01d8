mod render;
mod sandbox;

pub use render::{to_transform, to_vec3, GizmoRenderPlugin};
pub use sandbox::{
    command_for_key, exit_after_budget_system, FrameBudget, SandboxPlugin, SandboxSet,
};
