use std::time::Duration;

use crate::components::{ActorId, CooldownTimer};
use crate::resources::Clock;
use crate::scene::layout::DROP_START;
use crate::scene::{Scene, SceneError};
use crate::utils::pose_from;

const DROP_EVERY: Duration = Duration::from_secs(2);

/// Drops a box onto the trampoline every 2 s
#[derive(Debug, Clone)]
pub struct DropBox {
    id: ActorId,
    timer: CooldownTimer,
}

impl DropBox {
    pub fn new(id: ActorId, clock: &dyn Clock) -> Self {
        Self {
            id,
            timer: CooldownTimer::started(clock),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if self.timer.exceeded(scene.clock(), DROP_EVERY) {
            scene.dynamic(self.id)?.reset_to(pose_from(DROP_START))?;
            self.timer.reset(scene.clock());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierBackend;
    use crate::resources::{ClockSource, TimingMode};
    use crate::scene::layout::drop_box;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_box_returns_to_start() {
        let backend = RapierBackend::new(Vector3::new(0.0, -9.81, 0.0)).unwrap();
        let mut scene = Scene::new(Box::new(backend), ClockSource::new(TimingMode::Simulated));
        let id = scene.spawn(drop_box()).unwrap();
        let mut dropper = DropBox::new(id, scene.clock());

        let dt = Duration::from_millis(100);
        while scene.clock().now() <= DROP_EVERY {
            scene.step(dt).unwrap();
            let falling = scene.pose(id).unwrap().translation.y < DROP_START.y;
            scene.dispatch(|scene| dropper.update(scene)).unwrap();
            assert!(falling);
        }

        let pose = scene.pose(id).unwrap();
        assert_relative_eq!(pose.translation.vector, DROP_START, epsilon = 1e-5);
        assert_eq!(scene.linear_velocity(id).unwrap(), Vector3::zeros());
    }
}
