use bevy::log::info;
use nalgebra::Vector3;

use super::layout::{self, TEAM_SIZE};
use super::{Scene, SceneError, SceneScript};
use crate::components::{ActorId, JointDesc, JointId};
use crate::resources::{Command, RugbyConfig};
use crate::systems::scripts::{
    CannonBattery, Catapult, CatapultParts, DoorCycle, DropBox, GoalCelebration, JoustTeams,
    Projectile, WallDebris,
};
use crate::utils::{pose_at, pose_from, RngManager, SimError};

const EXTRA_JOUSTERS: usize = 100;

/// Handles of everything placed on the pitch at start-up
#[derive(Debug, Clone)]
pub struct RugbyActors {
    pub plane: ActorId,
    pub player: ActorId,
    pub field: ActorId,
    pub goal: ActorId,
    pub goal_trigger: ActorId,
    pub catapult: CatapultParts,
    pub cannons: [ActorId; 3],
    pub projectiles: Vec<Projectile>,
    pub team_one: Vec<ActorId>,
    pub team_two: Vec<ActorId>,
    pub wall: ActorId,
    pub door: ActorId,
    pub door_hinge: JointId,
    pub flag_pole: ActorId,
    pub goal_events: [[ActorId; layout::GOAL_EVENT_ROWS]; 2],
    pub trampoline: [ActorId; 2],
    pub springs: Vec<JointId>,
    pub drop_box: ActorId,
    pub pyramids: [ActorId; 2],
}

impl RugbyActors {
    pub fn build(scene: &mut Scene) -> Result<Self, SceneError> {
        let plane = scene.spawn(layout::ground())?;
        let player = scene.spawn(layout::player())?;
        let field = scene.spawn(layout::field())?;
        let goal = scene.spawn(layout::goal())?;
        let goal_trigger = scene.spawn(layout::goal_trigger())?;
        let ball = scene.spawn(layout::match_ball(pose_from(layout::BALL_START)))?;

        let base = scene.spawn(layout::catapult_base())?;
        let arm = scene.spawn(layout::catapult_arm())?;
        let hinge = scene.add_joint(layout::catapult_hinge(base, arm))?;

        let sites = layout::cannon_sites();
        let mut cannons = [ActorId(0); 3];
        let mut projectiles = Vec::with_capacity(sites.len());
        for (slot, site) in cannons.iter_mut().zip(&sites) {
            *slot = scene.spawn(layout::cannon(site.cannon))?;
            projectiles.push(Projectile {
                id: scene.spawn(layout::projectile(site.projectile))?,
                home: site.projectile,
                launch_force: site.launch_force,
            });
        }

        // Both lines start facing the same way, the first regroup turns team two around
        let mut team_one = Vec::with_capacity(TEAM_SIZE);
        let mut team_two = Vec::with_capacity(TEAM_SIZE);
        for index in 0..TEAM_SIZE {
            let x = -15.0 + 10.0 * index as f32;
            team_one.push(scene.spawn(layout::jouster(0, pose_at(x, 1.0, -10.0)))?);
            team_two.push(scene.spawn(layout::jouster(1, pose_at(x, 1.0, -30.0)))?);
        }

        let wall = scene.spawn(layout::wall())?;
        let door = scene.spawn(layout::door())?;
        let door_hinge = scene.add_joint(layout::door_hinge(door))?;
        let flag_pole = scene.spawn(layout::flag_pole())?;

        let mut goal_events = [[ActorId(0); layout::GOAL_EVENT_ROWS]; 2];
        for index in 0..layout::GOAL_EVENT_ROWS {
            for (side, row) in goal_events.iter_mut().enumerate() {
                row[index] =
                    scene.spawn(layout::goal_event_block(layout::goal_event_slot(side, index)))?;
            }
        }

        let parts = layout::trampoline(Vector3::new(4.0, 4.0, 4.0), 100.0, 0.5);
        let bottom = scene.spawn(parts.bottom)?;
        let top = scene.spawn(parts.top)?;
        let mut springs = Vec::with_capacity(parts.anchors.len());
        for (on_bottom, on_top) in parts.anchors {
            springs.push(scene.add_joint(JointDesc::spring(
                bottom,
                on_bottom,
                top,
                on_top,
                parts.rest_length,
                parts.stiffness,
                parts.damping,
            ))?);
        }
        let drop_box = scene.spawn(layout::drop_box())?;

        let pyramids = [
            scene.spawn(layout::convex_pyramid(pose_at(25.0, 2.0, -20.0), 2.0))?,
            scene.spawn(layout::mesh_pyramid(pose_at(-25.0, 0.0, -20.0), 2.0))?,
        ];

        info!("Rugby pitch built with {} actors", scene.actor_count());
        Ok(Self {
            plane,
            player,
            field,
            goal,
            goal_trigger,
            catapult: CatapultParts {
                base,
                arm,
                hinge,
                ball,
            },
            cannons,
            projectiles,
            team_one,
            team_two,
            wall,
            door,
            door_hinge,
            flag_pole,
            goal_events,
            trampoline: [bottom, top],
            springs,
            drop_box,
            pyramids,
        })
    }
}

/// Medieval rugby: a catapult kicks for goal past cannons, jousters and a
/// drawbridge while the crowd of blocks celebrates every score.
pub struct RugbyScript {
    actors: RugbyActors,
    drop_box: DropBox,
    door: DoorCycle,
    jousters: JoustTeams,
    cannons: CannonBattery,
    catapult: Catapult,
    celebration: GoalCelebration,
    debris: WallDebris,
    celebrating: bool,
    test_balls: usize,
    extra_jousters: usize,
}

impl RugbyScript {
    /// Rejects invalid settings before anything is placed on the pitch.
    pub fn new(scene: &mut Scene, config: &RugbyConfig) -> Result<Self, SceneError> {
        config.validate().map_err(|err| match err {
            SimError::InvalidConfig(reason) => SceneError::InvalidSettings(reason),
            other => SceneError::InvalidSettings(other.to_string()),
        })?;

        let actors = RugbyActors::build(scene)?;
        let clock = scene.clock();
        let rng = RngManager::new(config.seed).stream("catapult");

        Ok(Self {
            drop_box: DropBox::new(actors.drop_box, clock),
            door: DoorCycle::new(actors.door_hinge, clock),
            jousters: JoustTeams::new(actors.team_one.clone(), actors.team_two.clone(), clock),
            cannons: CannonBattery::new(actors.projectiles.clone(), clock),
            catapult: Catapult::new(
                actors.catapult,
                rng,
                config.drive_speed_min..config.drive_speed_max,
                config.move_force,
                clock,
            )?,
            celebration: GoalCelebration::new(actors.goal_events, clock),
            debris: WallDebris::new(config.debris_capacity),
            actors,
            celebrating: false,
            test_balls: 0,
            extra_jousters: 0,
        })
    }

    pub fn actors(&self) -> &RugbyActors {
        &self.actors
    }

    pub fn catapult(&self) -> &Catapult {
        &self.catapult
    }

    pub fn door(&self) -> &DoorCycle {
        &self.door
    }

    pub fn jousters(&self) -> &JoustTeams {
        &self.jousters
    }

    pub fn cannons(&self) -> &CannonBattery {
        &self.cannons
    }

    pub fn celebration(&self) -> &GoalCelebration {
        &self.celebration
    }

    pub fn debris(&self) -> &WallDebris {
        &self.debris
    }

    /// The ball currently on, or last thrown from, the catapult
    pub fn ball(&self) -> ActorId {
        self.catapult.parts().ball
    }

    pub fn test_balls(&self) -> usize {
        self.test_balls
    }

    pub fn extra_jousters(&self) -> usize {
        self.extra_jousters
    }

    fn spawn_test_balls(&mut self, scene: &mut Scene, count: usize) -> Result<(), SceneError> {
        for _ in 0..count {
            scene.spawn(layout::test_ball())?;
        }
        self.test_balls += count;
        info!("{} test balls in play", self.test_balls);
        Ok(())
    }

    fn spawn_jousters(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        for index in 0..EXTRA_JOUSTERS {
            let x = -250.0 + 5.0 * index as f32;
            scene.spawn(layout::jouster(0, pose_at(x, 1.0, 5.0)))?;
        }
        self.extra_jousters += EXTRA_JOUSTERS;
        info!("{} extra jousters in play", self.extra_jousters);
        Ok(())
    }

    fn react_to_goal(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let goal = scene.events().goal();
        if goal && !self.celebrating {
            info!(
                "Goal {:.2}s after the kick",
                self.catapult.flight_time(scene.clock()).as_secs_f32()
            );
        }
        self.celebrating = goal;
        self.celebration.react(scene)
    }
}

impl SceneScript for RugbyScript {
    fn name(&self) -> &str {
        "rugby"
    }

    fn apply(&mut self, scene: &mut Scene, command: Command) -> Result<(), SceneError> {
        match command {
            Command::MoveLeft => self.catapult.nudge(scene, -1.0),
            Command::MoveRight => self.catapult.nudge(scene, 1.0),
            Command::FieldGoal => self.catapult.field_goal(scene).map(|_| ()),
            Command::Reset => {
                self.catapult.cancel();
                Ok(())
            }
            Command::SpawnOne => self.spawn_test_balls(scene, 1),
            Command::SpawnMany(count) => self.spawn_test_balls(scene, count),
            Command::SpawnJousters => self.spawn_jousters(scene),
        }
    }

    fn post_step(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        self.drop_box.update(scene)?;
        self.door.update(scene)?;
        self.jousters.update(scene)?;
        self.cannons.update(scene)?;
        self.catapult.update(scene)?;
        self.react_to_goal(scene)?;
        self.debris.update(scene)?;
        self.celebration.restore(scene)
    }
}
