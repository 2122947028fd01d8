#![allow(dead_code)]

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Vector3};
use sandbox::{
    components::ActorId,
    physics::RapierBackend,
    resources::{Clock, ClockSource, RugbyConfig, SimulationConfig, TimingMode},
    scene::{layout, RugbyScript, Scene, SceneScript, SimulationEngine},
    systems::{CollisionEvent, CollisionKind},
    utils::pose_at,
};
use std::time::Duration;

/// Empty scene with the default gravity on the simulated clock
pub fn test_scene() -> Scene {
    let config = SimulationConfig::default();
    let backend = RapierBackend::new(config.physics.gravity).expect("backend");
    Scene::new(Box::new(backend), ClockSource::new(TimingMode::Simulated))
}

pub fn rugby_engine(config: &RugbyConfig) -> SimulationEngine<RugbyScript> {
    let mut scene = test_scene();
    let script = RugbyScript::new(&mut scene, config).expect("rugby scene");
    let dt = SimulationConfig::default().physics.step_duration();
    SimulationEngine::new(scene, script, dt)
}

/// Runs frames until the scene clock has passed `time`
pub fn run_until<S: SceneScript>(engine: &mut SimulationEngine<S>, time: Duration) {
    while engine.scene().clock().now() <= time {
        engine.frame().expect("frame");
    }
}

/// As `run_until`, calling `after` once each frame
pub fn run_until_each<S: SceneScript>(
    engine: &mut SimulationEngine<S>,
    time: Duration,
    mut after: impl FnMut(&SimulationEngine<S>),
) {
    while engine.scene().clock().now() <= time {
        engine.frame().expect("frame");
        after(engine);
    }
}

/// Trigger notification as the backend would report it for the goal volume
pub fn goal_event(kind: CollisionKind) -> CollisionEvent {
    CollisionEvent {
        kind,
        actors: [ActorId(1000), ActorId(1001)],
        names: [layout::GOAL_TRIGGER.to_string(), layout::BALL.to_string()],
        poses: [pose_at(0.0, 18.0, -100.0); 2],
        other_is_plane: false,
    }
}

/// Ball striking the wall with the ball at `ball`
pub fn wall_hit(ball: Isometry3<f32>) -> CollisionEvent {
    CollisionEvent {
        kind: CollisionKind::ContactEnter,
        actors: [ActorId(1002), ActorId(1003)],
        names: [layout::WALL.to_string(), layout::BALL.to_string()],
        poses: [pose_at(0.0, 10.0, -95.0), ball],
        other_is_plane: false,
    }
}

#[track_caller]
pub fn assert_translation_eq(scene: &Scene, id: ActorId, expected: Vector3<f32>) {
    let pose = scene.pose(id).expect("actor pose");
    assert_relative_eq!(pose.translation.vector, expected, epsilon = 1e-3);
}

#[track_caller]
pub fn assert_at_rest(scene: &Scene, id: ActorId) {
    let velocity = scene.linear_velocity(id).expect("actor velocity");
    assert_relative_eq!(velocity, Vector3::zeros(), epsilon = 1e-5);
}
