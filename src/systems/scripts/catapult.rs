use bevy::log::info;
use nalgebra::Vector3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use std::time::Duration;

use crate::components::{ActorId, ActorKind, CooldownTimer, JointId};
use crate::resources::Clock;
use crate::scene::layout::{match_ball, ARM_OFFSET, BALL_ON_ARM, BALL_START};
use crate::scene::{Scene, SceneError};
use crate::utils::{offset_translation, pose_from};

const SETTLE_AFTER: Duration = Duration::from_secs(1);

/// The pieces of a catapult already in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatapultParts {
    pub base: ActorId,
    pub arm: ActorId,
    pub hinge: JointId,
    pub ball: ActorId,
}

/// Field-goal catapult.
///
/// A launch swings the arm on a random motor speed. A second later the arm
/// is locked back in place above the base, and a fresh ball is loaded if the
/// last one was thrown. Between launches the ball rides on the arm.
#[derive(Debug, Clone)]
pub struct Catapult {
    parts: CatapultParts,
    /// A launch is in progress; further launches are ignored
    active: bool,
    /// The ball on the arm has not been thrown yet
    loaded: bool,
    settle_timer: CooldownTimer,
    flight_timer: CooldownTimer,
    rng: ChaCha8Rng,
    drive_speed: Range<f32>,
    move_force: f32,
    launches: u32,
}

impl Catapult {
    pub fn new(
        parts: CatapultParts,
        rng: ChaCha8Rng,
        drive_speed: Range<f32>,
        move_force: f32,
        clock: &dyn Clock,
    ) -> Result<Self, SceneError> {
        if !(drive_speed.start.is_finite() && drive_speed.end.is_finite())
            || drive_speed.is_empty()
        {
            return Err(SceneError::InvalidSettings(format!(
                "drive speed range [{}, {}) is empty",
                drive_speed.start, drive_speed.end
            )));
        }
        Ok(Self {
            parts,
            active: false,
            loaded: true,
            settle_timer: CooldownTimer::started(clock),
            flight_timer: CooldownTimer::started(clock),
            rng,
            drive_speed,
            move_force,
            launches: 0,
        })
    }

    pub fn parts(&self) -> CatapultParts {
        self.parts
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn launches(&self) -> u32 {
        self.launches
    }

    /// Time since the last launch
    pub fn flight_time(&self, clock: &dyn Clock) -> Duration {
        self.flight_timer.elapsed(clock)
    }

    /// Throws the ball unless a launch is already running.
    ///
    /// Returns whether a launch started.
    pub fn field_goal(&mut self, scene: &mut Scene) -> Result<bool, SceneError> {
        if self.active {
            return Ok(false);
        }
        self.settle_timer.reset(scene.clock());
        self.flight_timer.reset(scene.clock());
        self.active = true;

        scene.dynamic(self.parts.base)?.set_kinematic(true)?;
        scene.dynamic(self.parts.arm)?.set_kinematic(false)?;
        scene.dynamic(self.parts.ball)?.set_kinematic(false)?;
        self.loaded = false;

        let speed = self.rng.gen_range(self.drive_speed.clone());
        scene.set_joint_drive(self.parts.hinge, -speed)?;
        self.launches += 1;
        info!("Field goal attempt {} at drive speed {:.1}", self.launches, speed);
        Ok(true)
    }

    /// Frees the base and arm and shoves the base sideways, `direction` -1 left, 1 right.
    pub fn nudge(&mut self, scene: &mut Scene, direction: f32) -> Result<(), SceneError> {
        scene.dynamic(self.parts.base)?.set_kinematic(false)?;
        scene.dynamic(self.parts.arm)?.set_kinematic(false)?;
        scene
            .dynamic(self.parts.base)?
            .add_force(Vector3::new(direction * self.move_force, 0.0, 0.0))
    }

    /// Clears the launch guard without touching any actor.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Settles the arm after a launch, reloads and keeps the ball on the arm.
    pub fn update(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        if self.settle_timer.exceeded(scene.clock(), SETTLE_AFTER) {
            self.settle(scene)?;
        }
        if !self.active {
            self.carry_ball(scene)?;
        }
        Ok(())
    }

    fn settle(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let base = scene
            .pose(self.parts.base)
            .ok_or(SceneError::UnknownActor(self.parts.base))?;

        let mut arm = scene.dynamic(self.parts.arm)?;
        arm.set_kinematic(true)?;
        arm.set_pose(offset_translation(&base, ARM_OFFSET))?;
        scene.set_joint_drive(self.parts.hinge, 0.0)?;

        self.active = false;
        self.settle_timer.reset(scene.clock());

        if !self.loaded {
            self.parts.ball = scene.spawn(match_ball(pose_from(BALL_START)))?;
            self.loaded = true;
            info!("Ball {} loaded", self.parts.ball);
        }
        Ok(())
    }

    fn carry_ball(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let arm = scene
            .pose(self.parts.arm)
            .ok_or(SceneError::UnknownActor(self.parts.arm))?;
        let target = offset_translation(&arm, BALL_ON_ARM);

        let mut ball = scene.dynamic(self.parts.ball)?;
        if ball.kind() == Some(ActorKind::Kinematic) {
            ball.set_pose(target)
        } else {
            ball.reset_to(target)
        }
    }
}
