use bevy::log::debug;
use nalgebra::{Isometry3, Vector3};
use rapier3d::prelude::{
    ActiveEvents, CCDSolver, Collider, ColliderBuilder, ColliderHandle, ColliderSet,
    CollisionEvent, ContactPair, DefaultBroadPhase, EventHandler, GenericJoint,
    ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, InteractionGroups, IslandManager,
    JointAxis, MultibodyJointSet, NarrowPhase, PhysicsPipeline, QueryPipeline, Real,
    RevoluteJointBuilder, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    RigidBodyType, SharedShape, SpringJointBuilder,
};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::components::{ActorDesc, ActorId, ActorKind, Geometry, JointDesc, JointId, JointKind};
use crate::physics::{
    classify, ContactReport, FilterState, FilterTag, PairOutcome, PhysicsBackend, PhysicsError,
    StepResult, TouchStatus, TriggerReport,
};

/// Gain of revolute motors; high enough that drives reach their target within a few steps
const MOTOR_FACTOR: Real = 100.0;

#[derive(Debug, Clone, Copy)]
struct ColliderTag {
    actor: ActorId,
    filter: FilterState,
}

/// Receives collider events from the pipeline and keeps the ones the filter
/// policy reports.
#[derive(Default)]
struct PairRecorder {
    tags: HashMap<ColliderHandle, ColliderTag>,
    pending: Mutex<StepResult>,
}

impl PairRecorder {
    fn record(&self, first: ColliderHandle, second: ColliderHandle, status: TouchStatus) {
        let (Some(a), Some(b)) = (self.tags.get(&first), self.tags.get(&second)) else {
            return;
        };
        if a.actor == b.actor {
            return;
        }

        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match classify(&a.filter, &b.filter) {
            PairOutcome::TriggerNotify => {
                let (trigger, other) = if a.filter.trigger { (a, b) } else { (b, a) };
                pending.triggers.push(TriggerReport {
                    trigger: trigger.actor,
                    other: other.actor,
                    status,
                });
            }
            PairOutcome::ContactNotify => pending.contacts.push(ContactReport {
                actors: [a.actor, b.actor],
                status,
            }),
            PairOutcome::ContactSolveOnly => {}
        }
    }

    fn take(&self) -> StepResult {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *pending)
    }
}

impl EventHandler for PairRecorder {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            CollisionEvent::Started(a, b, _) => self.record(a, b, TouchStatus::Found),
            CollisionEvent::Stopped(a, b, _) => self.record(a, b, TouchStatus::Lost),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

fn body_type(kind: ActorKind) -> RigidBodyType {
    match kind {
        ActorKind::Static => RigidBodyType::Fixed,
        ActorKind::Kinematic => RigidBodyType::KinematicPositionBased,
        ActorKind::Simulated => RigidBodyType::Dynamic,
    }
}

fn cook(actor: &str, geometry: &Geometry) -> Result<SharedShape, PhysicsError> {
    let shape = match geometry {
        Geometry::Box { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        Geometry::Sphere { radius } => SharedShape::ball(*radius),
        Geometry::Capsule {
            radius,
            half_length,
        } => SharedShape::capsule_x(*half_length, *radius),
        Geometry::ConvexHull { points } => {
            SharedShape::convex_hull(points).ok_or_else(|| PhysicsError::CookingFailed {
                actor: actor.to_string(),
                reason: "convex hull computation failed".to_string(),
            })?
        }
        Geometry::Mesh { points, triangles } => {
            SharedShape::trimesh(points.clone(), triangles.clone()).map_err(|err| {
                PhysicsError::CookingFailed {
                    actor: actor.to_string(),
                    reason: format!("triangle mesh rejected: {err:?}"),
                }
            })?
        }
        Geometry::Plane => SharedShape::halfspace(Vector3::y_axis()),
    };
    Ok(shape)
}

/// `PhysicsBackend` on top of rapier3d
pub struct RapierBackend {
    gravity: Vector3<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Fixed body standing in for "the world" in world-anchored joints
    world_anchor: RigidBodyHandle,
    actors: HashMap<ActorId, RigidBodyHandle>,
    joints: HashMap<JointId, ImpulseJointHandle>,
    recorder: PairRecorder,
    /// Bodies with user forces to clear once the step consumed them
    forced: Vec<RigidBodyHandle>,
    /// Colliders removed since the last step, kept tagged so their lost contacts resolve
    retired: Vec<ColliderHandle>,
}

impl RapierBackend {
    pub fn new(gravity: Vector3<f32>) -> Result<Self, PhysicsError> {
        if !gravity.iter().all(|g| g.is_finite()) {
            return Err(PhysicsError::InitFailed(format!(
                "gravity must be finite, got {:?}",
                gravity
            )));
        }

        let mut bodies = RigidBodySet::new();
        let world_anchor = bodies.insert(RigidBodyBuilder::fixed().build());

        Ok(Self {
            gravity,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            world_anchor,
            actors: HashMap::new(),
            joints: HashMap::new(),
            recorder: PairRecorder::default(),
            forced: Vec::new(),
            retired: Vec::new(),
        })
    }

    fn handle(&self, id: ActorId) -> Result<RigidBodyHandle, PhysicsError> {
        self.actors
            .get(&id)
            .copied()
            .ok_or(PhysicsError::UnknownActor(id))
    }

    fn body_mut(&mut self, id: ActorId) -> Result<&mut RigidBody, PhysicsError> {
        let handle = self.handle(id)?;
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownActor(id))
    }

    fn build_colliders(desc: &ActorDesc) -> Result<Vec<(Collider, bool)>, PhysicsError> {
        desc.shapes
            .iter()
            .map(|shape| {
                let mut builder = ColliderBuilder::new(cook(&desc.name, &shape.geometry)?)
                    .position(shape.local_pose)
                    .density(desc.density)
                    .friction(desc.material.combined_friction())
                    .restitution(desc.material.restitution)
                    .sensor(shape.trigger)
                    .active_events(ActiveEvents::COLLISION_EVENTS);
                if !shape.simulation && !shape.trigger {
                    builder = builder.solver_groups(InteractionGroups::none());
                }
                Ok((builder.build(), shape.trigger))
            })
            .collect()
    }
}

impl PhysicsBackend for RapierBackend {
    fn name(&self) -> &'static str {
        "rapier3d"
    }

    fn create_actor(&mut self, id: ActorId, desc: &ActorDesc) -> Result<(), PhysicsError> {
        if self.actors.contains_key(&id) {
            return Err(PhysicsError::InvalidParameter(format!(
                "{id} already exists"
            )));
        }
        desc.validate()?;

        // Cook everything first so a failure leaves nothing behind
        let colliders = Self::build_colliders(desc)?;

        let body = RigidBodyBuilder::new(body_type(desc.kind))
            .position(desc.pose)
            .gravity_scale(if desc.gravity { 1.0 } else { 0.0 })
            .build();
        let handle = self.bodies.insert(body);

        for (collider, trigger) in colliders {
            let collider_handle =
                self.colliders
                    .insert_with_parent(collider, handle, &mut self.bodies);
            self.recorder.tags.insert(
                collider_handle,
                ColliderTag {
                    actor: id,
                    filter: FilterState {
                        tag: desc.filter,
                        trigger,
                    },
                },
            );
        }
        self.actors.insert(id, handle);
        debug!("Created {} '{}' as {:?}", id, desc.name, desc.kind);
        Ok(())
    }

    fn destroy_actor(&mut self, id: ActorId) -> Result<(), PhysicsError> {
        let handle = self
            .actors
            .remove(&id)
            .ok_or(PhysicsError::UnknownActor(id))?;

        if let Some(body) = self.bodies.get(handle) {
            self.retired.extend(body.colliders().iter().copied());
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        // Rapier drops attached joints along with the body
        let impulse_joints = &self.impulse_joints;
        self.joints
            .retain(|_, joint| impulse_joints.get(*joint).is_some());
        self.forced.retain(|forced| *forced != handle);
        Ok(())
    }

    fn create_joint(&mut self, id: JointId, desc: &JointDesc) -> Result<(), PhysicsError> {
        if self.joints.contains_key(&id) {
            return Err(PhysicsError::InvalidParameter(format!(
                "{id} already exists"
            )));
        }
        desc.validate().map_err(PhysicsError::InvalidParameter)?;

        let first = match desc.first {
            Some(actor) => self.handle(actor)?,
            None => self.world_anchor,
        };
        let second = self.handle(desc.second)?;

        let data: GenericJoint = match desc.kind {
            JointKind::Spring {
                rest_length,
                stiffness,
                damping,
            } => SpringJointBuilder::new(rest_length, stiffness, damping)
                .local_anchor1(desc.first_anchor)
                .local_anchor2(desc.second_anchor)
                .contacts_enabled(false)
                .build()
                .into(),
            JointKind::Revolute {
                limits,
                drive_velocity,
            } => {
                let mut builder = RevoluteJointBuilder::new(Vector3::x_axis())
                    .local_anchor1(desc.first_anchor)
                    .local_anchor2(desc.second_anchor)
                    .contacts_enabled(false)
                    .motor_velocity(drive_velocity, MOTOR_FACTOR);
                if let Some((lower, upper)) = limits {
                    builder = builder.limits([lower, upper]);
                }
                builder.build().into()
            }
        };

        let handle = self.impulse_joints.insert(first, second, data, true);
        self.joints.insert(id, handle);
        Ok(())
    }

    fn destroy_joint(&mut self, id: JointId) -> Result<(), PhysicsError> {
        let handle = self
            .joints
            .remove(&id)
            .ok_or(PhysicsError::UnknownJoint(id))?;
        self.impulse_joints.remove(handle, true);
        Ok(())
    }

    fn set_joint_drive(&mut self, id: JointId, velocity: f32) -> Result<(), PhysicsError> {
        if !velocity.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "drive velocity must be finite, got {velocity}"
            )));
        }
        let handle = *self.joints.get(&id).ok_or(PhysicsError::UnknownJoint(id))?;
        let joint = self
            .impulse_joints
            .get_mut(handle, false)
            .ok_or(PhysicsError::UnknownJoint(id))?;
        joint
            .data
            .set_motor_velocity(JointAxis::AngX, velocity, MOTOR_FACTOR);

        for body in [joint.body1, joint.body2] {
            if let Some(body) = self.bodies.get_mut(body) {
                body.wake_up(true);
            }
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) -> Result<StepResult, PhysicsError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "step size must be positive, got {dt}"
            )));
        }
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.recorder,
        );

        // Forces last one step, rapier keeps them until cleared
        for handle in self.forced.drain(..) {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.reset_forces(false);
            }
        }
        for handle in self.retired.drain(..) {
            self.recorder.tags.remove(&handle);
        }

        Ok(self.recorder.take())
    }

    fn pose(&self, id: ActorId) -> Option<Isometry3<f32>> {
        let handle = self.actors.get(&id)?;
        self.bodies.get(*handle).map(|body| *body.position())
    }

    fn linear_velocity(&self, id: ActorId) -> Option<Vector3<f32>> {
        let handle = self.actors.get(&id)?;
        self.bodies.get(*handle).map(|body| *body.linvel())
    }

    fn set_pose(&mut self, id: ActorId, pose: Isometry3<f32>) -> Result<(), PhysicsError> {
        self.body_mut(id)?.set_position(pose, true);
        Ok(())
    }

    fn set_velocities(
        &mut self,
        id: ActorId,
        linear: Vector3<f32>,
        angular: Vector3<f32>,
    ) -> Result<(), PhysicsError> {
        let body = self.body_mut(id)?;
        body.set_linvel(linear, true);
        body.set_angvel(angular, true);
        Ok(())
    }

    fn add_force(&mut self, id: ActorId, force: Vector3<f32>) -> Result<(), PhysicsError> {
        if !force.iter().all(|f| f.is_finite()) {
            return Err(PhysicsError::InvalidParameter(format!(
                "force must be finite, got {:?}",
                force
            )));
        }
        let handle = self.handle(id)?;
        self.body_mut(id)?.add_force(force, true);
        self.forced.push(handle);
        Ok(())
    }

    fn set_body_kind(&mut self, id: ActorId, kind: ActorKind) -> Result<(), PhysicsError> {
        self.body_mut(id)?.set_body_type(body_type(kind), true);
        Ok(())
    }

    fn set_filter(&mut self, id: ActorId, filter: FilterTag) -> Result<(), PhysicsError> {
        let handle = self.handle(id)?;
        let body = self
            .bodies
            .get(handle)
            .ok_or(PhysicsError::UnknownActor(id))?;
        for collider in body.colliders() {
            if let Some(tag) = self.recorder.tags.get_mut(collider) {
                tag.filter.tag = filter;
            }
        }
        Ok(())
    }

    fn actor_count(&self) -> usize {
        self.actors.len()
    }
}
