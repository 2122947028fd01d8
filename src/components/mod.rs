pub mod actor;
pub mod joint;
pub mod render;
pub mod timer;

pub use actor::{
    ActorDesc, ActorId, ActorKind, ActorRecord, Color, Geometry, Lifecycle, Material, Shape,
};
pub use joint::{JointDesc, JointId, JointKind, JointRecord};
pub use render::RenderItem;
pub use timer::CooldownTimer;
