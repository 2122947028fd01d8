use thiserror::Error;

use crate::components::{ActorId, JointId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Could not initialise physics: {0}")]
    InitFailed(String),

    #[error("Could not cook geometry for {actor}: {reason}")]
    CookingFailed { actor: String, reason: String },

    #[error("Unknown actor: {0}")]
    UnknownActor(ActorId),

    #[error("Unknown joint: {0}")]
    UnknownJoint(JointId),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
