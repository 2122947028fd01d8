use nalgebra::{Isometry3, Vector3};

use crate::components::{ActorDesc, ActorId, ActorKind, JointDesc, JointId};
use crate::physics::{FilterTag, PhysicsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchStatus {
    Found,
    Lost,
}

/// Two solid actors started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactReport {
    pub actors: [ActorId; 2],
    pub status: TouchStatus,
}

/// An actor entered or left a trigger volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerReport {
    pub trigger: ActorId,
    pub other: ActorId,
    pub status: TouchStatus,
}

/// Notifications produced by one step, in the order the solver emitted them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    pub contacts: Vec<ContactReport>,
    pub triggers: Vec<TriggerReport>,
}

impl StepResult {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.triggers.is_empty()
    }
}

/// Boundary to the rigid-body solver.
///
/// Only pairs whose filter outcome notifies are reported from `step`.
pub trait PhysicsBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn create_actor(&mut self, id: ActorId, desc: &ActorDesc) -> Result<(), PhysicsError>;
    fn destroy_actor(&mut self, id: ActorId) -> Result<(), PhysicsError>;

    fn create_joint(&mut self, id: JointId, desc: &JointDesc) -> Result<(), PhysicsError>;
    fn destroy_joint(&mut self, id: JointId) -> Result<(), PhysicsError>;
    /// Motor target velocity in rad/s for revolute joints
    fn set_joint_drive(&mut self, id: JointId, velocity: f32) -> Result<(), PhysicsError>;

    fn step(&mut self, dt: f32) -> Result<StepResult, PhysicsError>;

    fn pose(&self, id: ActorId) -> Option<Isometry3<f32>>;
    fn linear_velocity(&self, id: ActorId) -> Option<Vector3<f32>>;

    fn set_pose(&mut self, id: ActorId, pose: Isometry3<f32>) -> Result<(), PhysicsError>;
    fn set_velocities(
        &mut self,
        id: ActorId,
        linear: Vector3<f32>,
        angular: Vector3<f32>,
    ) -> Result<(), PhysicsError>;
    /// Force applied over the next step only
    fn add_force(&mut self, id: ActorId, force: Vector3<f32>) -> Result<(), PhysicsError>;
    fn set_body_kind(&mut self, id: ActorId, kind: ActorKind) -> Result<(), PhysicsError>;
    fn set_filter(&mut self, id: ActorId, filter: FilterTag) -> Result<(), PhysicsError>;

    fn actor_count(&self) -> usize;
}
