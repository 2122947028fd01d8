use bevy::log::debug;
use nalgebra::Vector3;
use std::collections::VecDeque;

use crate::components::ActorId;
use crate::scene::layout::debris;
use crate::scene::{Scene, SceneError};
use crate::utils::offset_translation;

/// Where a chip lands relative to the ball that knocked it off
pub const DEBRIS_DROP: Vector3<f32> = Vector3::new(0.0, -2.0, 0.0);

/// Chips knocked off the wall by the ball.
///
/// With a capacity, the oldest chip is removed once it is exceeded.
#[derive(Debug, Clone)]
pub struct WallDebris {
    pieces: VecDeque<ActorId>,
    capacity: Option<usize>,
}

impl WallDebris {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            pieces: VecDeque::new(),
            capacity,
        }
    }

    pub fn pieces(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.pieces.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Consumes a pending wall hit and spawns one chip below the ball.
    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let Some(ball) = scene.events_mut().take_wall_hit() else {
            return Ok(());
        };

        let id = scene.spawn(debris(offset_translation(&ball, DEBRIS_DROP)))?;
        self.pieces.push_back(id);
        debug!("Wall chipped, {} pieces", self.pieces.len());

        if let Some(capacity) = self.capacity {
            while self.pieces.len() > capacity {
                if let Some(oldest) = self.pieces.pop_front() {
                    scene.despawn(oldest)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierBackend;
    use crate::resources::{ClockSource, TimingMode};
    use crate::scene::layout::{BALL, DEBRIS, WALL};
    use crate::systems::{CollisionEvent, CollisionKind};
    use crate::utils::pose_at;
    use approx::assert_relative_eq;
    use std::time::Duration;

    const DT: Duration = Duration::from_millis(20);

    fn scene() -> Scene {
        let backend = RapierBackend::new(Vector3::zeros()).unwrap();
        Scene::new(Box::new(backend), ClockSource::new(TimingMode::Simulated))
    }

    fn hit(scene: &mut Scene, x: f32) {
        scene.events_mut().ingest(&[CollisionEvent {
            kind: CollisionKind::ContactEnter,
            actors: [ActorId(100), ActorId(101)],
            names: [WALL.to_string(), BALL.to_string()],
            poses: [pose_at(0.0, 10.0, -95.0), pose_at(x, 12.0, -93.0)],
            other_is_plane: false,
        }]);
    }

    #[test]
    fn test_nothing_without_a_hit() {
        let mut scene = scene();
        let mut debris = WallDebris::new(None);
        scene.dispatch(|scene| debris.update(scene)).unwrap();
        assert!(debris.is_empty());
    }

    #[test]
    fn test_hit_spawns_one_piece_below_ball() {
        let mut scene = scene();
        let mut debris = WallDebris::new(None);
        hit(&mut scene, 3.0);
        scene.dispatch(|scene| debris.update(scene)).unwrap();
        scene.dispatch(|scene| debris.update(scene)).unwrap();

        assert_eq!(debris.len(), 1);
        let piece = debris.pieces().next().unwrap();
        assert!(!scene.actor(piece).unwrap().is_live());

        scene.step(DT).unwrap();
        let pose = scene.pose(piece).unwrap();
        assert_relative_eq!(
            pose.translation.vector,
            Vector3::new(3.0, 10.0, -93.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_oldest_piece_removed_over_capacity() {
        let mut scene = scene();
        let mut debris = WallDebris::new(Some(2));
        for x in 0..3 {
            hit(&mut scene, x as f32);
            scene.dispatch(|scene| debris.update(scene)).unwrap();
            scene.step(DT).unwrap();
        }

        assert_eq!(debris.len(), 2);
        assert_eq!(scene.count_named(DEBRIS), 2);
    }
}
