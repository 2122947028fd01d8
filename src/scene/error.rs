use thiserror::Error;

use crate::components::{ActorId, JointId};
use crate::physics::PhysicsError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("Unknown actor: {0}")]
    UnknownActor(ActorId),

    #[error("Unknown joint: {0}")]
    UnknownJoint(JointId),

    #[error("'{0}' is static")]
    NotDynamic(String),

    #[error("'{0}' is not static")]
    NotStatic(String),

    #[error("Cannot {action} '{name}': actor is not simulated")]
    NotSimulated { name: String, action: &'static str },

    #[error("Cannot {action} '{name}': actor is not kinematic")]
    NotKinematic { name: String, action: &'static str },

    #[error("'{0}' is waiting for the next step boundary")]
    PendingActor(String),

    #[error("Invalid joint: {0}")]
    InvalidJoint(String),

    #[error("Invalid scene settings: {0}")]
    InvalidSettings(String),
}
