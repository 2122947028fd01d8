use bevy::log::warn;
use nalgebra::{Isometry3, Vector3};

use super::{Scene, SceneError};
use crate::components::{ActorId, ActorKind, ActorRecord, Lifecycle};
use crate::physics::FilterTag;

fn rejected(err: SceneError) -> SceneError {
    warn!("Rejected mutation: {}", err);
    err
}

/// Mutable view of a kinematic or simulated actor
pub struct DynamicActor<'a> {
    scene: &'a mut Scene,
    id: ActorId,
}

impl<'a> DynamicActor<'a> {
    pub(super) fn new(scene: &'a mut Scene, id: ActorId) -> Self {
        Self { scene, id }
    }

    fn record(&self) -> Result<&ActorRecord, SceneError> {
        self.scene
            .actors
            .get(&self.id)
            .ok_or(SceneError::UnknownActor(self.id))
    }

    fn record_mut(&mut self) -> Result<&mut ActorRecord, SceneError> {
        self.scene
            .actors
            .get_mut(&self.id)
            .ok_or(SceneError::UnknownActor(self.id))
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.record().map(|record| record.name()).unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ActorKind> {
        self.record().ok().map(|record| record.kind())
    }

    pub fn pose(&self) -> Option<Isometry3<f32>> {
        self.scene.pose(self.id)
    }

    pub fn linear_velocity(&self) -> Option<Vector3<f32>> {
        self.scene.linear_velocity(self.id)
    }

    /// Switches between scripted and solver-driven motion.
    pub fn set_kinematic(&mut self, kinematic: bool) -> Result<(), SceneError> {
        let kind = if kinematic {
            ActorKind::Kinematic
        } else {
            ActorKind::Simulated
        };
        let id = self.id;
        let record = self.record()?;
        if record.kind() == kind {
            return Ok(());
        }
        if record.is_live() {
            self.scene.backend.set_body_kind(id, kind)?;
        }
        self.record_mut()?.desc.kind = kind;
        Ok(())
    }

    /// Pushes a simulated actor for the next step.
    pub fn add_force(&mut self, force: Vector3<f32>) -> Result<(), SceneError> {
        let id = self.id;
        let record = self.record()?;
        if record.kind() != ActorKind::Simulated {
            return Err(rejected(SceneError::NotSimulated {
                name: record.name().to_string(),
                action: "add force to",
            }));
        }
        if record.lifecycle == Lifecycle::Pending {
            return Err(rejected(SceneError::PendingActor(
                record.name().to_string(),
            )));
        }
        self.scene.backend.add_force(id, force)?;
        Ok(())
    }

    /// Moves a kinematic actor.
    pub fn set_pose(&mut self, pose: Isometry3<f32>) -> Result<(), SceneError> {
        let id = self.id;
        let record = self.record()?;
        if record.kind() != ActorKind::Kinematic {
            return Err(rejected(SceneError::NotKinematic {
                name: record.name().to_string(),
                action: "set pose of",
            }));
        }
        if record.is_live() {
            self.scene.backend.set_pose(id, pose)?;
        } else {
            self.record_mut()?.desc.pose = pose;
        }
        Ok(())
    }

    /// Scripted hard reset: teleports the actor and stops it.
    pub fn reset_to(&mut self, pose: Isometry3<f32>) -> Result<(), SceneError> {
        let id = self.id;
        if self.record()?.is_live() {
            self.scene.backend.set_pose(id, pose)?;
            self.scene
                .backend
                .set_velocities(id, Vector3::zeros(), Vector3::zeros())?;
        } else {
            self.record_mut()?.desc.pose = pose;
        }
        Ok(())
    }

    pub fn set_filter(&mut self, filter: FilterTag) -> Result<(), SceneError> {
        let id = self.id;
        if self.record()?.is_live() {
            self.scene.backend.set_filter(id, filter)?;
        }
        self.record_mut()?.desc.filter = filter;
        Ok(())
    }
}

/// Read-only view of an actor that never moves
pub struct StaticActor<'a> {
    record: &'a ActorRecord,
    pose: Isometry3<f32>,
}

impl<'a> StaticActor<'a> {
    pub(super) fn new(record: &'a ActorRecord, pose: Isometry3<f32>) -> Self {
        Self { record, pose }
    }

    pub fn id(&self) -> ActorId {
        self.record.id
    }

    pub fn name(&self) -> &str {
        self.record.name()
    }

    pub fn pose(&self) -> Isometry3<f32> {
        self.pose
    }
}
