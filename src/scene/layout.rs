//! Names, placements and compound shapes of the medieval rugby pitch.

use nalgebra::{Isometry3, Point3, Vector3};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::components::{ActorDesc, ActorId, ActorKind, Color, JointDesc, Material, Shape};
use crate::physics::{FilterTag, ACTOR0, ACTOR1};
use crate::utils::{pose_at, pose_from, pose_with_yaw};

pub const PLANE: &str = "PLANE";
pub const PLAYER: &str = "PLAYER";
pub const FIELD: &str = "FIELD";
pub const GOAL: &str = "GOAL";
pub const GOAL_TRIGGER: &str = "GOALCOLLISION";
pub const BALL: &str = "BALL";
pub const BASE: &str = "BASE";
pub const THROW: &str = "THROW";
pub const CANNON: &str = "CANNON";
pub const PROJECTILE: &str = "PROJ";
pub const JOUSTER: &str = "JOUST";
pub const WALL: &str = "WALL";
pub const DOOR: &str = "DOOR";
pub const FLAG_POLE: &str = "FLAGPOLE";
pub const GOAL_EVENT: &str = "GOALEVENT";
pub const TRAMPOLINE: &str = "TRAMPOLINE";
pub const DROP_BOX: &str = "DROP";
pub const PYRAMID: &str = "PYRAMID";
pub const DEBRIS: &str = "DEBRIS";
pub const TEST_BALL: &str = "TESTBALL";

/// Ball reports contacts with the wall and only the wall
pub const BALL_FILTER: FilterTag = FilterTag::new(ACTOR1, ACTOR0);
pub const WALL_FILTER: FilterTag = FilterTag::new(ACTOR0, ACTOR1);

pub const BALL_START: Vector3<f32> = Vector3::new(0.0, 6.5, -1.0);
pub const BASE_START: Vector3<f32> = Vector3::new(0.0, 5.5, -5.0);
/// Throw arm origin relative to the catapult base
pub const ARM_OFFSET: Vector3<f32> = Vector3::new(0.0, 0.0, 4.0);
/// Ball resting position relative to the throw arm
pub const BALL_ON_ARM: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);
pub const CATAPULT_LIMITS: (f32, f32) = (-FRAC_PI_2, FRAC_PI_2);

pub const DROP_START: Vector3<f32> = Vector3::new(-35.0, 15.5, -75.0);
pub const TEST_BALL_START: Vector3<f32> = Vector3::new(0.0, 20.0, -10.0);

pub const TEAM_SIZE: usize = 4;
pub const GOAL_EVENT_ROWS: usize = 5;

const BALL_COLOR: Color = [0.7, 0.0, 0.7];
const TEST_BALL_COLOR: Color = [0.4, 0.2, 0.7];
const TEAM_ONE_COLOR: Color = [0.2, 0.2, 0.6];
const TEAM_TWO_COLOR: Color = [0.6, 0.2, 0.2];
const STONE: Color = [0.44, 0.5, 0.56];
const RED_ALERT: Color = [0.8, 0.1, 0.1];
const TEAL: Color = [4.0 / 255.0, 117.0 / 255.0, 111.0 / 255.0];

/// Apex plus four base corners
pub const PYRAMID_POINTS: [[f32; 3]; 5] = [
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];
/// Counter-clockwise seen from outside
pub const PYRAMID_TRIANGLES: [[u32; 3]; 6] = [
    [1, 4, 0],
    [3, 1, 0],
    [2, 3, 0],
    [4, 2, 0],
    [3, 2, 1],
    [2, 4, 1],
];

/// Where jouster `index` of `team` (0 or 1) lines up; team two faces team one.
pub fn joust_formation(team: usize, index: usize) -> Isometry3<f32> {
    let x = -15.0 + 10.0 * index as f32;
    match team {
        0 => pose_at(x, 1.0, -10.0),
        _ => pose_with_yaw(Vector3::new(x, 1.0, -30.0), PI),
    }
}

/// Resting place of goal decoration `index` in `side` (0 left, 1 right)
pub fn goal_event_slot(side: usize, index: usize) -> Isometry3<f32> {
    let x = if side == 0 { -45.0 } else { 45.0 };
    pose_at(x, 1.0 + 2.0 * index as f32, -95.0)
}

pub struct CannonSite {
    pub cannon: Isometry3<f32>,
    pub projectile: Vector3<f32>,
    /// One-shot push applied when the battery fires
    pub launch_force: Vector3<f32>,
}

pub fn cannon_sites() -> [CannonSite; 3] {
    [
        CannonSite {
            cannon: pose_with_yaw(Vector3::new(-40.0, 4.0, -50.0), 3.0 * PI / 2.0),
            projectile: Vector3::new(-36.0, 4.0, -50.0),
            launch_force: Vector3::new(4000.0, 3800.0, 0.0),
        },
        CannonSite {
            cannon: pose_with_yaw(Vector3::new(40.0, 4.0, -40.0), PI / 2.0),
            projectile: Vector3::new(36.0, 4.0, -40.0),
            launch_force: Vector3::new(-4000.0, 3600.0, 0.0),
        },
        CannonSite {
            cannon: pose_with_yaw(Vector3::new(-40.0, 4.0, -30.0), 3.0 * PI / 2.0),
            projectile: Vector3::new(-36.0, 4.0, -30.0),
            launch_force: Vector3::new(4000.0, 3400.0, 0.0),
        },
    ]
}

pub fn ground() -> ActorDesc {
    ActorDesc::new(PLANE, ActorKind::Static, Isometry3::identity())
        .with_shape(Shape::plane())
        .with_material(Material::GRASS)
        .with_color([0.0, 0.4, 0.0])
}

/// Capsule with a fat middle
pub fn rugby_ball(name: &str, kind: ActorKind, pose: Isometry3<f32>) -> ActorDesc {
    ActorDesc::new(name, kind, pose).with_shapes([
        Shape::capsule(0.2, 0.3),
        Shape::sphere(0.3),
    ])
}

/// The ball sitting on the catapult, waiting for a field goal
pub fn match_ball(pose: Isometry3<f32>) -> ActorDesc {
    rugby_ball(BALL, ActorKind::Kinematic, pose)
        .with_material(Material::RUGBY_BALL)
        .with_filter(BALL_FILTER)
        .with_color(BALL_COLOR)
}

pub fn test_ball() -> ActorDesc {
    rugby_ball(
        TEST_BALL,
        ActorKind::Simulated,
        pose_from(TEST_BALL_START),
    )
    .with_color(TEST_BALL_COLOR)
}

pub fn player() -> ActorDesc {
    ActorDesc::new(PLAYER, ActorKind::Simulated, pose_at(10.0, 3.0, 0.0))
        .with_shapes([
            Shape::cuboid(0.5, 1.0, 0.3),
            Shape::sphere(0.4).offset(0.0, 1.5, 0.0),
            Shape::cuboid(0.2, 0.75, 0.2).offset(0.25, -1.75, 0.0),
            Shape::cuboid(0.2, 0.75, 0.2).offset(-0.25, -1.75, 0.0),
        ])
        .with_color([0.6, 0.0, 0.0])
}

/// Raised stand the catapult sits on, plus touchline rails
pub fn field() -> ActorDesc {
    ActorDesc::new(FIELD, ActorKind::Kinematic, Isometry3::identity())
        .with_shapes([
            Shape::cuboid(6.0, 2.5, 6.0).offset(0.0, 2.5, -2.0),
            Shape::cuboid(0.5, 0.5, 50.0).offset(-50.0, 0.5, -50.0),
            Shape::cuboid(0.5, 0.5, 50.0).offset(50.0, 0.5, -50.0),
        ])
        .with_color([0.3, 0.25, 0.1])
}

/// Posts and crossbar
pub fn goal() -> ActorDesc {
    ActorDesc::new(GOAL, ActorKind::Kinematic, pose_at(0.0, 6.0, -100.0))
        .with_shapes([
            Shape::cuboid(0.3, 12.0, 0.3).offset(-4.3, 6.0, 0.0),
            Shape::cuboid(0.3, 12.0, 0.3).offset(4.3, 6.0, 0.0),
            Shape::cuboid(4.0, 0.3, 0.3).offset(0.0, 6.0, 0.0),
        ])
        .with_color([0.0, 1.0, 1.0])
}

/// Volume between the posts above the crossbar
pub fn goal_trigger() -> ActorDesc {
    ActorDesc::new(GOAL_TRIGGER, ActorKind::Kinematic, pose_at(0.0, 18.0, -100.0))
        .with_shape(Shape::cuboid(4.0, 6.0, 0.5).as_trigger())
        .with_color([0.0, 0.0, 0.0])
}

pub fn catapult_base() -> ActorDesc {
    ActorDesc::new(BASE, ActorKind::Kinematic, pose_from(BASE_START))
        .with_shapes([
            Shape::cuboid(1.5, 0.5, 1.5),
            Shape::cuboid(0.2, 1.0, 0.2).offset(1.0, 1.5, 0.0),
            Shape::cuboid(0.2, 1.0, 0.2).offset(-1.0, 1.5, 0.0),
        ])
        .with_material(Material::CATAPULT)
        .with_density(100.0)
        .with_color([1.0, 0.0, 0.0])
}

/// Beam running back to the hinge with a cup at the origin
pub fn catapult_arm() -> ActorDesc {
    ActorDesc::new(
        THROW,
        ActorKind::Kinematic,
        pose_from(BASE_START + ARM_OFFSET),
    )
    .with_shapes([
        Shape::cuboid(0.25, 0.25, 2.0).offset(0.0, 0.0, -2.0),
        Shape::cuboid(0.6, 0.1, 0.6).offset(0.0, 0.35, 0.0),
    ])
    .with_material(Material::CATAPULT)
    .without_gravity()
    .with_color([0.6, 0.2, 0.0])
}

/// Hinge from the base origin to the far end of the arm
pub fn catapult_hinge(base: ActorId, arm: ActorId) -> JointDesc {
    JointDesc::revolute(
        Some(base),
        Point3::origin(),
        arm,
        Point3::from(-ARM_OFFSET),
    )
    .with_limits(CATAPULT_LIMITS.0, CATAPULT_LIMITS.1)
}

pub fn cannon(pose: Isometry3<f32>) -> ActorDesc {
    ActorDesc::new(CANNON, ActorKind::Kinematic, pose)
        .with_shapes([
            Shape::cuboid(6.0, 2.0, 2.0),
            Shape::cuboid(2.0, 2.0, 2.0).offset(2.0, 0.0, -2.0),
            Shape::cuboid(2.0, 2.0, 2.0).offset(-2.0, 0.0, -2.0),
            Shape::cuboid(2.0, 2.0, 2.0).offset(0.0, -2.0, 0.0),
        ])
        .with_density(100.0)
        .with_color([0.7, 0.1, 0.2])
}

pub fn projectile(position: Vector3<f32>) -> ActorDesc {
    ActorDesc::new(PROJECTILE, ActorKind::Simulated, pose_from(position))
        .with_shape(Shape::sphere(2.0))
        .with_density(5.0)
        .with_color([1.0, 0.5, 0.5])
}

/// Horse, rider and lance
pub fn jouster(team: usize, pose: Isometry3<f32>) -> ActorDesc {
    ActorDesc::new(JOUSTER, ActorKind::Simulated, pose)
        .with_shapes([
            Shape::cuboid(0.5, 0.5, 1.0),
            Shape::cuboid(0.3, 0.6, 0.3).offset(0.0, 1.1, 0.0),
            Shape::cuboid(0.1, 0.1, 1.5).offset(0.4, 1.2, -1.5),
        ])
        .with_color(if team == 0 {
            TEAM_ONE_COLOR
        } else {
            TEAM_TWO_COLOR
        })
}

/// Two wall sections flanking the goal
pub fn wall() -> ActorDesc {
    ActorDesc::new(WALL, ActorKind::Kinematic, pose_at(0.0, 10.0, -95.0))
        .with_shapes([
            Shape::cuboid(14.0, 10.0, 1.0).offset(-20.0, 0.0, 0.0),
            Shape::cuboid(14.0, 10.0, 1.0).offset(20.0, 0.0, 0.0),
        ])
        .with_material(Material::WALL)
        .with_filter(WALL_FILTER)
        .with_color(STONE)
}

pub fn door() -> ActorDesc {
    ActorDesc::new(DOOR, ActorKind::Simulated, pose_at(0.0, 0.0, -80.0))
        .with_shape(Shape::cuboid(20.0, 0.2, 15.0))
        .with_color([0.8, 0.1, 0.0])
}

/// World-anchored hinge along the door's far edge
pub fn door_hinge(door: ActorId) -> JointDesc {
    JointDesc::revolute(
        None,
        Point3::new(0.0, 0.0, -95.0),
        door,
        Point3::new(0.0, 0.0, -15.0),
    )
}

pub fn flag_pole() -> ActorDesc {
    ActorDesc::new(FLAG_POLE, ActorKind::Kinematic, pose_at(0.0, 42.0, -95.0))
        .with_shape(Shape::cuboid(0.5, 5.0, 0.5))
        .with_color(STONE)
}

pub fn goal_event_block(pose: Isometry3<f32>) -> ActorDesc {
    ActorDesc::new(GOAL_EVENT, ActorKind::Simulated, pose)
        .with_shape(Shape::cuboid(1.0, 1.0, 1.0))
        .with_color(RED_ALERT)
}

pub fn debris(pose: Isometry3<f32>) -> ActorDesc {
    ActorDesc::new(DEBRIS, ActorKind::Simulated, pose)
        .with_shape(Shape::cuboid(0.4, 0.4, 0.4))
        .with_color(STONE)
}

pub fn drop_box() -> ActorDesc {
    ActorDesc::new(DROP_BOX, ActorKind::Simulated, pose_from(DROP_START))
        .with_shape(Shape::cuboid(2.0, 2.0, 2.0))
        .with_color(TEAL)
}

/// Bottom plate, top plate and the four corner springs between them
pub struct TrampolineParts {
    pub bottom: ActorDesc,
    pub top: ActorDesc,
    /// Anchor pairs in bottom and top plate frames
    pub anchors: [(Point3<f32>, Point3<f32>); 4],
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

pub fn trampoline(half: Vector3<f32>, stiffness: f32, damping: f32) -> TrampolineParts {
    let thickness = 0.1;
    let plate = Shape::cuboid(half.x, thickness, half.z);
    let bottom = ActorDesc::new(
        TRAMPOLINE,
        ActorKind::Kinematic,
        pose_at(-35.0, thickness, -75.0),
    )
    .with_shape(plate.clone())
    .with_material(Material::TRAMPOLINE);
    let top = ActorDesc::new(
        TRAMPOLINE,
        ActorKind::Simulated,
        pose_at(-35.0, half.y + thickness, -75.0),
    )
    .with_shape(plate)
    .with_material(Material::TRAMPOLINE);

    let corner = |sx: f32, sz: f32| {
        (
            Point3::new(sx * half.x, thickness, sz * half.z),
            Point3::new(sx * half.x, -half.y, sz * half.z),
        )
    };
    TrampolineParts {
        bottom,
        top,
        anchors: [
            corner(1.0, 1.0),
            corner(1.0, -1.0),
            corner(-1.0, 1.0),
            corner(-1.0, -1.0),
        ],
        rest_length: half.y,
        stiffness,
        damping,
    }
}

fn pyramid_points(scale: f32) -> Vec<Point3<f32>> {
    PYRAMID_POINTS
        .iter()
        .map(|[x, y, z]| Point3::new(x * scale, y * scale, z * scale))
        .collect()
}

pub fn convex_pyramid(pose: Isometry3<f32>, scale: f32) -> ActorDesc {
    ActorDesc::new(PYRAMID, ActorKind::Simulated, pose)
        .with_shape(Shape::convex_hull(pyramid_points(scale)))
        .with_color([1.0, 140.0 / 255.0, 54.0 / 255.0])
}

pub fn mesh_pyramid(pose: Isometry3<f32>, scale: f32) -> ActorDesc {
    ActorDesc::new(PYRAMID, ActorKind::Static, pose)
        .with_shape(Shape::mesh(
            pyramid_points(scale),
            PYRAMID_TRIANGLES.to_vec(),
        ))
        .with_color([217.0 / 255.0, 0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_every_piece_cooks() {
        let sites = cannon_sites();
        let mut descs = vec![
            ground(),
            match_ball(pose_from(BALL_START)),
            test_ball(),
            player(),
            field(),
            goal(),
            goal_trigger(),
            catapult_base(),
            catapult_arm(),
            wall(),
            door(),
            flag_pole(),
            drop_box(),
            debris(Isometry3::identity()),
            goal_event_block(goal_event_slot(0, 0)),
            convex_pyramid(Isometry3::identity(), 2.0),
            mesh_pyramid(Isometry3::identity(), 2.0),
        ];
        for site in &sites {
            descs.push(cannon(site.cannon));
            descs.push(projectile(site.projectile));
        }
        let parts = trampoline(Vector3::new(4.0, 4.0, 4.0), 100.0, 0.5);
        descs.push(parts.bottom);
        descs.push(parts.top);

        for desc in descs {
            assert!(desc.validate().is_ok(), "{} failed to validate", desc.name);
        }
    }

    #[test]
    fn test_ball_rests_on_arm_at_start() {
        assert_relative_eq!(BASE_START + ARM_OFFSET + BALL_ON_ARM, BALL_START);
    }

    #[test]
    fn test_team_two_faces_team_one() {
        let one = joust_formation(0, 0);
        let two = joust_formation(1, 0);
        assert_relative_eq!(one.translation.vector, Vector3::new(-15.0, 1.0, -10.0));
        assert_relative_eq!(two.translation.vector, Vector3::new(-15.0, 1.0, -30.0));
        let facing = two.rotation * Vector3::z();
        assert_relative_eq!(facing, -Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(
            joust_formation(0, 3).translation.x,
            15.0
        );
    }

    #[test]
    fn test_goal_event_rows_mirror() {
        for index in 0..GOAL_EVENT_ROWS {
            let left = goal_event_slot(0, index).translation.vector;
            let right = goal_event_slot(1, index).translation.vector;
            assert_relative_eq!(left.x + 90.0, right.x);
            assert_relative_eq!(left.y, 1.0 + 2.0 * index as f32);
        }
    }
}
