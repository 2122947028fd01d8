use bevy::log::debug;
use nalgebra::Vector3;
use std::time::Duration;

use crate::components::{ActorId, CooldownTimer};
use crate::resources::Clock;
use crate::scene::{Scene, SceneError};
use crate::utils::pose_from;

const FIRE_AT: Duration = Duration::from_secs(1);
const RELOAD_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub id: ActorId,
    pub home: Vector3<f32>,
    pub launch_force: Vector3<f32>,
}

/// Fires every projectile once per 5 s cycle, 1 s into the cycle.
///
/// The launch is a single-step force, so projectiles only roll out of the
/// barrel rather than fly.
#[derive(Debug, Clone)]
pub struct CannonBattery {
    projectiles: Vec<Projectile>,
    timer: CooldownTimer,
    fired: bool,
    volleys: u32,
}

impl CannonBattery {
    pub fn new(projectiles: Vec<Projectile>, clock: &dyn Clock) -> Self {
        Self {
            projectiles,
            timer: CooldownTimer::started(clock),
            fired: false,
            volleys: 0,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn volleys(&self) -> u32 {
        self.volleys
    }

    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let elapsed = self.timer.elapsed(scene.clock());

        if elapsed > RELOAD_AFTER {
            for projectile in &self.projectiles {
                scene
                    .dynamic(projectile.id)?
                    .reset_to(pose_from(projectile.home))?;
            }
            self.timer.reset(scene.clock());
            self.fired = false;
        } else if elapsed >= FIRE_AT && !self.fired {
            for projectile in &self.projectiles {
                scene
                    .dynamic(projectile.id)?
                    .add_force(projectile.launch_force)?;
            }
            self.fired = true;
            self.volleys += 1;
            debug!("Cannon volley {}", self.volleys);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierBackend;
    use crate::resources::{ClockSource, TimingMode};
    use crate::scene::layout::{cannon_sites, ground, projectile};
    use approx::assert_relative_eq;

    const DT: Duration = Duration::from_millis(50);

    fn rig() -> (Scene, CannonBattery) {
        let backend = RapierBackend::new(Vector3::new(0.0, -9.81, 0.0)).unwrap();
        let mut scene = Scene::new(Box::new(backend), ClockSource::new(TimingMode::Simulated));
        scene.spawn(ground()).unwrap();
        let projectiles = cannon_sites()
            .iter()
            .map(|site| Projectile {
                id: scene.spawn(projectile(site.projectile)).unwrap(),
                home: site.projectile,
                launch_force: site.launch_force,
            })
            .collect();
        let battery = CannonBattery::new(projectiles, scene.clock());
        (scene, battery)
    }

    fn run_until(scene: &mut Scene, battery: &mut CannonBattery, time: Duration) {
        while scene.clock().now() < time {
            scene.step(DT).unwrap();
            scene.dispatch(|scene| battery.update(scene)).unwrap();
        }
    }

    #[test]
    fn test_fires_once_per_cycle() {
        let (mut scene, mut battery) = rig();
        run_until(&mut scene, &mut battery, Duration::from_millis(950));
        assert!(!battery.has_fired());

        run_until(&mut scene, &mut battery, Duration::from_millis(1000));
        assert!(battery.has_fired());
        run_until(&mut scene, &mut battery, Duration::from_secs(4));
        assert_eq!(battery.volleys(), 1);
    }

    #[test]
    fn test_reload_returns_projectiles_home() {
        let (mut scene, mut battery) = rig();
        run_until(&mut scene, &mut battery, Duration::from_millis(5050));

        assert!(!battery.has_fired());
        for projectile in battery.projectiles() {
            let pose = scene.pose(projectile.id).unwrap();
            assert_relative_eq!(pose.translation.vector, projectile.home, epsilon = 1e-4);
        }
    }
}
