use bevy::log::{debug, info};
use nalgebra::Isometry3;

use crate::components::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    TriggerEnter,
    TriggerExit,
    ContactEnter,
    ContactExit,
}

impl CollisionKind {
    pub fn is_trigger(self) -> bool {
        matches!(self, CollisionKind::TriggerEnter | CollisionKind::TriggerExit)
    }
}

/// A notification from the last step, resolved to actor names and poses.
///
/// For trigger events index 0 is the trigger volume and index 1 the actor
/// that entered or left it.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    pub actors: [ActorId; 2],
    pub names: [String; 2],
    pub poses: [Isometry3<f32>; 2],
    pub other_is_plane: bool,
}

impl CollisionEvent {
    pub fn other_name(&self) -> &str {
        &self.names[1]
    }
}

/// Names the sink reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkWatch {
    /// Actor whose arrival in a trigger counts as a goal
    pub goal_actor: String,
    /// Contact pair that latches a hit; the pose of `hit_subject` is recorded
    pub hit_target: String,
    pub hit_subject: String,
}

impl Default for SinkWatch {
    fn default() -> Self {
        Self {
            goal_actor: "BALL".to_string(),
            hit_target: "WALL".to_string(),
            hit_subject: "BALL".to_string(),
        }
    }
}

/// Folds one step's notifications into flags the scene scripts poll.
///
/// Several events of the same kind within a step collapse into one flag and
/// the latest pose.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    watch: SinkWatch,
    goal: bool,
    trigger: bool,
    goal_count: u32,
    wall_hit: Option<Isometry3<f32>>,
}

impl EventSink {
    pub fn new(watch: SinkWatch) -> Self {
        Self {
            watch,
            ..Default::default()
        }
    }

    pub fn ingest(&mut self, events: &[CollisionEvent]) {
        for event in events {
            match event.kind {
                CollisionKind::TriggerEnter | CollisionKind::TriggerExit => self.on_trigger(event),
                CollisionKind::ContactEnter => self.on_contact(event),
                CollisionKind::ContactExit => {}
            }
        }
    }

    fn on_trigger(&mut self, event: &CollisionEvent) {
        if event.other_is_plane {
            return;
        }
        match event.kind {
            CollisionKind::TriggerEnter => {
                self.trigger = true;
                if event.other_name() == self.watch.goal_actor {
                    self.goal = true;
                    self.goal_count += 1;
                    info!("Goal! {} goals scored", self.goal_count);
                }
            }
            CollisionKind::TriggerExit => {
                self.trigger = false;
                self.goal = false;
            }
            _ => {}
        }
    }

    fn on_contact(&mut self, event: &CollisionEvent) {
        debug!("Contact found: {} <-> {}", event.names[0], event.names[1]);

        let [first, second] = &event.names;
        let subject = if *first == self.watch.hit_target && *second == self.watch.hit_subject {
            Some(1)
        } else if *second == self.watch.hit_target && *first == self.watch.hit_subject {
            Some(0)
        } else {
            None
        };
        if let Some(index) = subject {
            self.wall_hit = Some(event.poses[index]);
        }
    }

    /// Something other than the ground is inside a trigger
    pub fn trigger(&self) -> bool {
        self.trigger
    }

    /// The goal actor is inside a trigger
    pub fn goal(&self) -> bool {
        self.goal
    }

    pub fn goal_count(&self) -> u32 {
        self.goal_count
    }

    pub fn wall_hit_pending(&self) -> bool {
        self.wall_hit.is_some()
    }

    /// Consumes the latched hit, returning the subject's pose at contact.
    pub fn take_wall_hit(&mut self) -> Option<Isometry3<f32>> {
        self.wall_hit.take()
    }

    pub fn reset(&mut self) {
        let watch = std::mem::take(&mut self.watch);
        *self = Self::new(watch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trigger_event(kind: CollisionKind, other: &str, other_is_plane: bool) -> CollisionEvent {
        CollisionEvent {
            kind,
            actors: [ActorId(0), ActorId(1)],
            names: ["GOALCOLLISION".to_string(), other.to_string()],
            poses: [Isometry3::identity(); 2],
            other_is_plane,
        }
    }

    fn contact_event(first: &str, second: &str, second_y: f32) -> CollisionEvent {
        CollisionEvent {
            kind: CollisionKind::ContactEnter,
            actors: [ActorId(0), ActorId(1)],
            names: [first.to_string(), second.to_string()],
            poses: [
                Isometry3::translation(0.0, 10.0, -95.0),
                Isometry3::translation(0.0, second_y, -94.0),
            ],
            other_is_plane: false,
        }
    }

    #[test]
    fn test_goal_counted_on_enter_and_cleared_on_exit() {
        let mut sink = EventSink::default();

        sink.ingest(&[trigger_event(CollisionKind::TriggerEnter, "BALL", false)]);
        assert!(sink.goal());
        assert!(sink.trigger());
        assert_eq!(sink.goal_count(), 1);

        sink.ingest(&[trigger_event(CollisionKind::TriggerExit, "BALL", false)]);
        assert!(!sink.goal());
        assert!(!sink.trigger());
        assert_eq!(sink.goal_count(), 1);
    }

    #[test]
    fn test_other_actor_sets_trigger_only() {
        let mut sink = EventSink::default();
        sink.ingest(&[trigger_event(CollisionKind::TriggerEnter, "JOUST", false)]);
        assert!(sink.trigger());
        assert!(!sink.goal());
        assert_eq!(sink.goal_count(), 0);
    }

    #[test]
    fn test_plane_overlaps_ignored() {
        let mut sink = EventSink::default();
        sink.ingest(&[trigger_event(CollisionKind::TriggerEnter, "PLANE", true)]);
        assert!(!sink.trigger());
    }

    #[test]
    fn test_wall_hit_records_ball_pose_in_either_order() {
        let mut sink = EventSink::default();
        sink.ingest(&[contact_event("WALL", "BALL", 7.0)]);
        let pose = sink.take_wall_hit().unwrap();
        assert_relative_eq!(pose.translation.y, 7.0);
        assert!(sink.take_wall_hit().is_none());

        sink.ingest(&[contact_event("BALL", "WALL", 3.0)]);
        // Ball is first here, so the first pose is recorded
        let pose = sink.take_wall_hit().unwrap();
        assert_relative_eq!(pose.translation.y, 10.0);
    }

    #[test]
    fn test_unwatched_contacts_ignored() {
        let mut sink = EventSink::default();
        sink.ingest(&[contact_event("WALL", "JOUST", 2.0)]);
        assert!(!sink.wall_hit_pending());
    }

    #[test]
    fn test_hits_in_one_step_coalesce_to_latest() {
        let mut sink = EventSink::default();
        sink.ingest(&[contact_event("WALL", "BALL", 1.0), contact_event("WALL", "BALL", 2.0)]);
        assert_relative_eq!(sink.take_wall_hit().unwrap().translation.y, 2.0);
        assert!(!sink.wall_hit_pending());
    }

    #[test]
    fn test_reset_keeps_watch() {
        let mut sink = EventSink::new(SinkWatch {
            goal_actor: "PUCK".to_string(),
            ..Default::default()
        });
        sink.ingest(&[trigger_event(CollisionKind::TriggerEnter, "PUCK", false)]);
        sink.reset();
        assert!(!sink.goal());

        sink.ingest(&[trigger_event(CollisionKind::TriggerEnter, "PUCK", false)]);
        assert!(sink.goal());
    }
}
