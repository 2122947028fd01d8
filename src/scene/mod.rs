pub mod demos;
pub mod engine;
pub mod error;
pub mod handles;
pub mod layout;
pub mod rugby;

pub use demos::{BoxWallScript, FallingBoxesScript};
pub use engine::{SceneScript, SimulationEngine};
pub use error::SceneError;
pub use handles::{DynamicActor, StaticActor};
pub use rugby::{RugbyActors, RugbyScript};

use bevy::log::{debug, warn};
use nalgebra::{Isometry3, Vector3};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::components::{
    ActorDesc, ActorId, ActorRecord, JointDesc, JointId, JointKind, JointRecord,
    Lifecycle, RenderItem,
};
use crate::physics::{PhysicsBackend, StepResult, TouchStatus};
use crate::resources::{Clock, ClockSource};
use crate::systems::{CollisionEvent, CollisionKind, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingOp {
    Spawn(ActorId),
    Despawn(ActorId),
}

/// Owns every actor and joint, the timer clock and the event sink.
///
/// All mutation goes through `&mut Scene`, so nothing can change while the
/// backend is stepping. Spawns and despawns requested while events are being
/// dispatched are queued and applied at the start of the next step.
pub struct Scene {
    backend: Box<dyn PhysicsBackend>,
    actors: BTreeMap<ActorId, ActorRecord>,
    joints: BTreeMap<JointId, JointRecord>,
    pending: VecDeque<PendingOp>,
    /// Destroyed before the current step, still needed to name lost contacts
    retired: BTreeMap<ActorId, ActorRecord>,
    dispatching: bool,
    clock: ClockSource,
    sink: EventSink,
    last_events: Vec<CollisionEvent>,
    next_actor: u64,
    next_joint: u64,
    steps: u64,
}

impl Scene {
    pub fn new(backend: Box<dyn PhysicsBackend>, clock: ClockSource) -> Self {
        Self {
            backend,
            actors: BTreeMap::new(),
            joints: BTreeMap::new(),
            pending: VecDeque::new(),
            retired: BTreeMap::new(),
            dispatching: false,
            clock,
            sink: EventSink::default(),
            last_events: Vec::new(),
            next_actor: 0,
            next_joint: 0,
            steps: 0,
        }
    }

    pub fn with_sink(mut self, sink: EventSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn clock(&self) -> &dyn Clock {
        &self.clock
    }

    pub fn events(&self) -> &EventSink {
        &self.sink
    }

    pub fn events_mut(&mut self) -> &mut EventSink {
        &mut self.sink
    }

    /// Notifications produced by the most recent step
    pub fn last_events(&self) -> &[CollisionEvent] {
        &self.last_events
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching
    }

    /// Runs `f` with spawns and despawns deferred to the next step boundary.
    pub fn dispatch<R>(&mut self, f: impl FnOnce(&mut Scene) -> R) -> R {
        self.dispatching = true;
        let result = f(self);
        self.dispatching = false;
        result
    }

    pub fn spawn(&mut self, desc: ActorDesc) -> Result<ActorId, SceneError> {
        desc.validate()?;

        let id = ActorId(self.next_actor);
        let lifecycle = if self.dispatching {
            self.pending.push_back(PendingOp::Spawn(id));
            debug!("Deferred spawn of '{}' as {}", desc.name, id);
            Lifecycle::Pending
        } else {
            self.backend.create_actor(id, &desc)?;
            Lifecycle::Live
        };
        self.next_actor += 1;
        self.actors.insert(
            id,
            ActorRecord {
                id,
                desc,
                lifecycle,
            },
        );
        Ok(id)
    }

    /// Removes an actor along with every joint attached to it.
    pub fn despawn(&mut self, id: ActorId) -> Result<(), SceneError> {
        if !self.actors.contains_key(&id) {
            return Err(SceneError::UnknownActor(id));
        }
        if self.dispatching {
            if !self.pending.contains(&PendingOp::Despawn(id)) {
                self.pending.push_back(PendingOp::Despawn(id));
            }
            return Ok(());
        }
        self.destroy(id)
    }

    fn destroy(&mut self, id: ActorId) -> Result<(), SceneError> {
        let record = self
            .actors
            .remove(&id)
            .ok_or(SceneError::UnknownActor(id))?;

        let attached: Vec<JointId> = self
            .joints
            .values()
            .filter(|joint| joint.desc.involves(id))
            .map(|joint| joint.id)
            .collect();
        for joint in attached {
            self.joints.remove(&joint);
            self.backend.destroy_joint(joint)?;
        }

        if record.is_live() {
            // Lost contacts reported next step carry the final pose
            let mut record = record;
            if let Some(pose) = self.backend.pose(id) {
                record.desc.pose = pose;
            }
            self.backend.destroy_actor(id)?;
            self.retired.insert(id, record);
        }
        Ok(())
    }

    fn flush_pending(&mut self) -> Result<(), SceneError> {
        while let Some(op) = self.pending.pop_front() {
            match op {
                PendingOp::Spawn(id) => {
                    let Some(record) = self.actors.get_mut(&id) else {
                        continue;
                    };
                    if record.is_live() {
                        continue;
                    }
                    match self.backend.create_actor(id, &record.desc) {
                        Ok(()) => record.lifecycle = Lifecycle::Live,
                        Err(err) => {
                            warn!("Dropping deferred spawn of '{}': {}", record.desc.name, err);
                            self.actors.remove(&id);
                        }
                    }
                }
                PendingOp::Despawn(id) => {
                    if self.actors.contains_key(&id) {
                        self.destroy(id)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies deferred work, advances the solver by `dt` and feeds the
    /// resulting notifications to the event sink.
    pub fn step(&mut self, dt: Duration) -> Result<(), SceneError> {
        self.flush_pending()?;

        let result = self.backend.step(dt.as_secs_f32())?;
        self.clock.advance(dt);
        self.steps += 1;

        self.last_events = self.resolve_events(&result);
        self.retired.clear();
        self.sink.ingest(&self.last_events);
        Ok(())
    }

    fn resolve_events(&self, result: &StepResult) -> Vec<CollisionEvent> {
        let triggers = result.triggers.iter().filter_map(|report| {
            let kind = match report.status {
                TouchStatus::Found => CollisionKind::TriggerEnter,
                TouchStatus::Lost => CollisionKind::TriggerExit,
            };
            self.resolve([report.trigger, report.other], kind)
        });
        let contacts = result.contacts.iter().filter_map(|report| {
            let kind = match report.status {
                TouchStatus::Found => CollisionKind::ContactEnter,
                TouchStatus::Lost => CollisionKind::ContactExit,
            };
            self.resolve(report.actors, kind)
        });
        triggers.chain(contacts).collect()
    }

    fn resolve(&self, actors: [ActorId; 2], kind: CollisionKind) -> Option<CollisionEvent> {
        let lookup = |id: ActorId| self.actors.get(&id).or_else(|| self.retired.get(&id));
        let first = lookup(actors[0])?;
        let second = lookup(actors[1])?;
        let pose = |record: &ActorRecord| self.backend.pose(record.id).unwrap_or(record.desc.pose);

        Some(CollisionEvent {
            kind,
            actors,
            names: [first.name().to_string(), second.name().to_string()],
            poses: [pose(first), pose(second)],
            other_is_plane: second.is_plane(),
        })
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorRecord> {
        self.actors.values()
    }

    /// First actor with this name, oldest first
    pub fn find(&self, name: &str) -> Option<ActorId> {
        self.actors
            .values()
            .find(|record| record.name() == name)
            .map(|record| record.id)
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.actors
            .values()
            .filter(|record| record.name() == name)
            .count()
    }

    /// Actors owned by the scene, including ones still pending creation
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Actors that exist in the solver
    pub fn live_actor_count(&self) -> usize {
        self.backend.actor_count()
    }

    /// Pose after the last completed step, or the requested pose for pending actors.
    pub fn pose(&self, id: ActorId) -> Option<Isometry3<f32>> {
        let record = self.actors.get(&id)?;
        match record.lifecycle {
            Lifecycle::Live => self.backend.pose(id),
            Lifecycle::Pending => Some(record.desc.pose),
        }
    }

    pub fn linear_velocity(&self, id: ActorId) -> Option<Vector3<f32>> {
        let record = self.actors.get(&id)?;
        match record.lifecycle {
            Lifecycle::Live => self.backend.linear_velocity(id),
            Lifecycle::Pending => Some(Vector3::zeros()),
        }
    }

    /// Mutable access to a kinematic or simulated actor
    pub fn dynamic(&mut self, id: ActorId) -> Result<DynamicActor<'_>, SceneError> {
        let record = self.actors.get(&id).ok_or(SceneError::UnknownActor(id))?;
        if !record.kind().is_dynamic() {
            return Err(SceneError::NotDynamic(record.name().to_string()));
        }
        Ok(DynamicActor::new(self, id))
    }

    pub fn static_actor(&self, id: ActorId) -> Result<StaticActor<'_>, SceneError> {
        let record = self.actors.get(&id).ok_or(SceneError::UnknownActor(id))?;
        if record.kind().is_dynamic() {
            return Err(SceneError::NotStatic(record.name().to_string()));
        }
        Ok(StaticActor::new(record, self.pose(id).unwrap_or(record.desc.pose)))
    }

    pub fn add_joint(&mut self, desc: JointDesc) -> Result<JointId, SceneError> {
        desc.validate().map_err(SceneError::InvalidJoint)?;
        for actor in desc.first.into_iter().chain([desc.second]) {
            let record = self
                .actors
                .get(&actor)
                .ok_or(SceneError::UnknownActor(actor))?;
            if !record.is_live() {
                return Err(SceneError::PendingActor(record.name().to_string()));
            }
        }

        let id = JointId(self.next_joint);
        self.backend.create_joint(id, &desc)?;
        self.next_joint += 1;
        self.joints.insert(id, JointRecord { id, desc });
        Ok(id)
    }

    pub fn remove_joint(&mut self, id: JointId) -> Result<(), SceneError> {
        self.joints.remove(&id).ok_or(SceneError::UnknownJoint(id))?;
        self.backend.destroy_joint(id)?;
        Ok(())
    }

    pub fn joint(&self, id: JointId) -> Option<&JointRecord> {
        self.joints.get(&id)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn set_joint_drive(&mut self, id: JointId, velocity: f32) -> Result<(), SceneError> {
        let joint = self
            .joints
            .get_mut(&id)
            .ok_or(SceneError::UnknownJoint(id))?;
        let JointKind::Revolute { drive_velocity, .. } = &mut joint.desc.kind
        else {
            return Err(SceneError::InvalidJoint(format!("{id} has no drive")));
        };
        self.backend.set_joint_drive(id, velocity)?;
        *drive_velocity = velocity;
        Ok(())
    }

    /// Everything the renderer draws this frame
    pub fn render_list(&self) -> Vec<RenderItem> {
        self.actors
            .values()
            .filter_map(|record| {
                Some(RenderItem {
                    name: record.name().to_string(),
                    kind: record.kind(),
                    pose: self.pose(record.id)?,
                    shapes: record.desc.shapes.clone(),
                    color: record.desc.color,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActorKind, Shape};
    use crate::physics::{FilterTag, RapierBackend, ACTOR0, ACTOR1};
    use crate::resources::TimingMode;
    use crate::systems::SinkWatch;
    use nalgebra::Point3;

    const DT: Duration = Duration::from_millis(16);

    fn scene() -> Scene {
        let backend = RapierBackend::new(Vector3::new(0.0, -9.81, 0.0)).unwrap();
        Scene::new(Box::new(backend), ClockSource::new(TimingMode::Simulated))
    }

    fn crate_box(name: &str, kind: ActorKind, y: f32) -> ActorDesc {
        ActorDesc::new(name, kind, Isometry3::translation(0.0, y, 0.0))
            .with_shape(Shape::cuboid(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_spawn_outside_dispatch_is_immediate() {
        let mut scene = scene();
        let id = scene
            .spawn(crate_box("BOX", ActorKind::Simulated, 2.0))
            .unwrap();
        assert!(scene.actor(id).unwrap().is_live());
        assert_eq!(scene.live_actor_count(), 1);
    }

    #[test]
    fn test_spawn_during_dispatch_waits_for_step() {
        let mut scene = scene();
        let id = scene
            .dispatch(|scene| scene.spawn(crate_box("DEBRIS", ActorKind::Simulated, 2.0)))
            .unwrap();

        assert_eq!(scene.actor(id).unwrap().lifecycle, Lifecycle::Pending);
        assert_eq!(scene.live_actor_count(), 0);
        assert_eq!(
            scene.pose(id).unwrap().translation.vector,
            Vector3::new(0.0, 2.0, 0.0)
        );

        scene.step(DT).unwrap();
        assert!(scene.actor(id).unwrap().is_live());
        assert_eq!(scene.live_actor_count(), 1);
    }

    #[test]
    fn test_despawn_during_dispatch_waits_for_step() {
        let mut scene = scene();
        let id = scene
            .spawn(crate_box("BOX", ActorKind::Simulated, 2.0))
            .unwrap();

        scene.dispatch(|scene| scene.despawn(id)).unwrap();
        assert!(scene.actor(id).is_some());

        scene.step(DT).unwrap();
        assert!(scene.actor(id).is_none());
        assert_eq!(scene.live_actor_count(), 0);
    }

    #[test]
    fn test_despawn_removes_attached_joints() {
        let mut scene = scene();
        let base = scene.spawn(crate_box("BASE", ActorKind::Kinematic, 2.0)).unwrap();
        let arm = scene.spawn(crate_box("THROW", ActorKind::Simulated, 2.0)).unwrap();
        let hinge = scene
            .add_joint(JointDesc::revolute(
                Some(base),
                Point3::origin(),
                arm,
                Point3::new(0.0, 0.0, -1.0),
            ))
            .unwrap();

        scene.despawn(arm).unwrap();
        assert!(scene.joint(hinge).is_none());
        assert_eq!(scene.joint_count(), 0);
        scene.step(DT).unwrap();
    }

    #[test]
    fn test_remove_joint_frees_the_pair() {
        let mut scene = scene();
        let base = scene.spawn(crate_box("BASE", ActorKind::Kinematic, 2.0)).unwrap();
        let arm = scene
            .spawn(
                ActorDesc::new("ARM", ActorKind::Simulated, Isometry3::translation(3.0, 2.0, 0.0))
                    .with_shape(Shape::cuboid(0.5, 0.5, 0.5)),
            )
            .unwrap();
        let hinge = scene
            .add_joint(JointDesc::revolute(
                Some(base),
                Point3::origin(),
                arm,
                Point3::new(0.0, 0.0, -1.0),
            ))
            .unwrap();

        scene.remove_joint(hinge).unwrap();
        assert!(scene.joint(hinge).is_none());
        assert_eq!(scene.remove_joint(hinge), Err(SceneError::UnknownJoint(hinge)));

        // Nothing holds the arm up any more
        for _ in 0..30 {
            scene.step(DT).unwrap();
        }
        assert!(scene.pose(arm).unwrap().translation.y < 1.5);
        assert!(scene.actor(base).is_some());
    }

    #[test]
    fn test_joint_to_pending_actor_rejected() {
        let mut scene = scene();
        let base = scene.spawn(crate_box("BASE", ActorKind::Kinematic, 2.0)).unwrap();
        let pending = scene
            .dispatch(|scene| scene.spawn(crate_box("ARM", ActorKind::Simulated, 2.0)))
            .unwrap();

        let result = scene.add_joint(JointDesc::revolute(
            Some(base),
            Point3::origin(),
            pending,
            Point3::origin(),
        ));
        assert_eq!(result, Err(SceneError::PendingActor("ARM".to_string())));
    }

    #[test]
    fn test_cooking_failure_adds_nothing() {
        let mut scene = scene();
        let broken = ActorDesc::new("BROKEN", ActorKind::Simulated, Isometry3::identity())
            .with_shape(Shape::sphere(-1.0));
        assert!(matches!(
            scene.spawn(broken),
            Err(SceneError::Physics(crate::physics::PhysicsError::CookingFailed { .. }))
        ));
        assert_eq!(scene.actor_count(), 0);
    }

    #[test]
    fn test_capability_queries() {
        let mut scene = scene();
        let ground = scene
            .spawn(
                ActorDesc::new("PLANE", ActorKind::Static, Isometry3::identity())
                    .with_shape(Shape::plane()),
            )
            .unwrap();
        let body = scene.spawn(crate_box("BOX", ActorKind::Simulated, 2.0)).unwrap();

        assert!(scene.static_actor(ground).is_ok());
        assert_eq!(
            scene.dynamic(ground).err(),
            Some(SceneError::NotDynamic("PLANE".to_string()))
        );
        assert!(scene.dynamic(body).is_ok());
        assert!(scene.static_actor(body).is_err());
    }

    #[test]
    fn test_clock_follows_steps() {
        let mut scene = scene();
        for _ in 0..10 {
            scene.step(DT).unwrap();
        }
        assert_eq!(scene.clock().now(), DT * 10);
        assert_eq!(scene.steps(), 10);
    }

    #[test]
    fn test_contacts_resolved_to_names() {
        let mut scene = scene();
        scene
            .spawn(
                ActorDesc::new("WALL", ActorKind::Static, Isometry3::identity())
                    .with_shape(Shape::cuboid(5.0, 0.5, 5.0))
                    .with_filter(FilterTag::new(ACTOR0, ACTOR1)),
            )
            .unwrap();
        scene
            .spawn(
                ActorDesc::new("BALL", ActorKind::Simulated, Isometry3::translation(0.0, 2.0, 0.0))
                    .with_shape(Shape::sphere(0.5))
                    .with_filter(FilterTag::new(ACTOR1, ACTOR0)),
            )
            .unwrap();

        let mut hit = None;
        for _ in 0..120 {
            scene.step(DT).unwrap();
            if let Some(pose) = scene.events_mut().take_wall_hit() {
                hit = Some(pose);
                break;
            }
        }

        let pose = hit.expect("ball never reported hitting the wall");
        assert!(pose.translation.y < 2.0);
        assert!(pose.translation.y > 0.5);
    }
    #[test]
    fn test_custom_watch_latches_its_own_pair() {
        let watch = SinkWatch {
            hit_target: "TARGET".to_string(),
            hit_subject: "PUCK".to_string(),
            ..Default::default()
        };
        let mut scene = scene().with_sink(EventSink::new(watch));
        scene
            .spawn(
                ActorDesc::new("TARGET", ActorKind::Static, Isometry3::identity())
                    .with_shape(Shape::cuboid(5.0, 0.5, 5.0))
                    .with_filter(FilterTag::new(ACTOR0, ACTOR1)),
            )
            .unwrap();
        scene
            .spawn(
                ActorDesc::new("PUCK", ActorKind::Simulated, Isometry3::translation(0.0, 2.0, 0.0))
                    .with_shape(Shape::cuboid(0.5, 0.2, 0.5))
                    .with_filter(FilterTag::new(ACTOR1, ACTOR0)),
            )
            .unwrap();

        let mut latched = false;
        for _ in 0..120 {
            scene.step(DT).unwrap();
            if scene.events_mut().take_wall_hit().is_some() {
                latched = true;
                break;
            }
        }
        assert!(latched, "puck never latched a hit on the target");
    }

    #[test]
    fn test_lost_contact_of_despawned_actor_has_last_pose() {
        let mut scene = scene();
        scene
            .spawn(
                ActorDesc::new("WALL", ActorKind::Static, Isometry3::identity())
                    .with_shape(Shape::cuboid(5.0, 0.5, 5.0))
                    .with_filter(FilterTag::new(ACTOR0, ACTOR1)),
            )
            .unwrap();
        let ball = scene
            .spawn(
                ActorDesc::new("BALL", ActorKind::Simulated, Isometry3::translation(0.0, 3.0, 0.0))
                    .with_shape(Shape::sphere(0.5))
                    .with_filter(FilterTag::new(ACTOR1, ACTOR0)),
            )
            .unwrap();
        for _ in 0..120 {
            scene.step(DT).unwrap();
        }
        let resting = scene.pose(ball).unwrap();

        scene.dispatch(|scene| scene.despawn(ball)).unwrap();
        scene.step(DT).unwrap();
        let event = scene
            .last_events()
            .iter()
            .find(|event| event.kind == CollisionKind::ContactExit)
            .expect("no lost contact for the despawned ball");
        let slot = event.actors.iter().position(|id| *id == ball).unwrap();
        assert!((event.poses[slot].translation.y - resting.translation.y).abs() < 0.1);
        assert!(event.poses[slot].translation.y < 2.0);
    }
}
