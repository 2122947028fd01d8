use bevy::log::info;
use nalgebra::Vector3;

use super::{Scene, SceneError, SceneScript};
use crate::components::{ActorDesc, ActorId, ActorKind, Color, Shape};
use crate::scene::layout;
use crate::utils::{pose_at, pose_from};

const BOX_COUNT: usize = 10;
const KICK: Vector3<f32> = Vector3::new(2000.0, 250.0, 0.0);

fn unit_box(name: &str, x: f32, y: f32, z: f32) -> ActorDesc {
    ActorDesc::new(name, ActorKind::Simulated, pose_at(x, y, z))
        .with_shape(Shape::cuboid(0.5, 0.5, 0.5))
}

/// A column of boxes on a plane; the bottom one gets kicked once and its
/// motion is traced every step.
pub struct FallingBoxesScript {
    boxes: Vec<ActorId>,
}

impl FallingBoxesScript {
    pub fn new(scene: &mut Scene) -> Result<Self, SceneError> {
        scene.spawn(layout::ground().with_color([210.0 / 255.0; 3]))?;
        let boxes = (0..BOX_COUNT)
            .map(|i| scene.spawn(unit_box("BOX", 0.0, 0.5 + i as f32, 0.0)))
            .collect::<Result<Vec<_>, _>>()?;

        scene.dynamic(boxes[0])?.add_force(KICK)?;
        Ok(Self { boxes })
    }

    pub fn boxes(&self) -> &[ActorId] {
        &self.boxes
    }
}

impl SceneScript for FallingBoxesScript {
    fn name(&self) -> &str {
        "boxes"
    }

    fn post_step(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        let id = self.boxes[0];
        let (Some(pose), Some(velocity)) = (scene.pose(id), scene.linear_velocity(id)) else {
            return Err(SceneError::UnknownActor(id));
        };
        let p = pose.translation.vector;
        info!(
            "{} x={:.2}, y={:.2}, z={:.2}, vx={:.2}, vy={:.2}, vz={:.2}",
            scene.steps(),
            p.x,
            p.y,
            p.z,
            velocity.x,
            velocity.y,
            velocity.z
        );
        Ok(())
    }
}

const WALL_SIDE: usize = 10;
const BLUE: Color = [0.0, 0.0, 1.0];
const RED: Color = [1.0, 0.0, 0.0];
const SHOVE: Vector3<f32> = Vector3::new(0.0, 200.0, -500.0);
const THRUST: Vector3<f32> = Vector3::new(0.0, 0.0, -100.0);
const BULLET_HOME: Vector3<f32> = Vector3::new(-0.5, 1.5, 3.0);
/// Frames between bullet resets
const BULLET_RELOAD: u32 = 200;

/// A wall of boxes, an L-shaped compound shoved into it and a weightless
/// bullet fired from a gun every few seconds.
pub struct BoxWallScript {
    wall: Vec<ActorId>,
    compound: ActorId,
    bullet: ActorId,
    frames: u32,
}

impl BoxWallScript {
    pub fn new(scene: &mut Scene) -> Result<Self, SceneError> {
        scene.spawn(layout::ground().with_color([210.0 / 255.0; 3]))?;

        let mut wall = Vec::with_capacity(WALL_SIDE * WALL_SIDE);
        for row in 0..WALL_SIDE {
            let color = if row % 2 == 0 { BLUE } else { RED };
            for column in 0..WALL_SIDE {
                let desc = unit_box("WALLBOX", -5.0 + column as f32, 0.5 + row as f32, -5.0)
                    .with_color(color);
                wall.push(scene.spawn(desc)?);
            }
        }

        let compound = scene.spawn(
            ActorDesc::new("COMPOUND", ActorKind::Simulated, pose_at(2.0, 0.5, 3.0))
                .with_shapes([
                    Shape::cuboid(0.5, 0.5, 0.5),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(1.0, 0.0, 0.0),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(2.0, 0.0, 0.0),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(2.0, 1.0, 0.0),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(2.0, 2.0, 0.0),
                    Shape::cuboid(1.0, 1.0, 1.0).offset(2.0, 3.0, 0.0),
                ])
                .with_color([1.0, 0.5, 0.0]),
        )?;

        scene.spawn(
            ActorDesc::new("GUN", ActorKind::Kinematic, pose_at(-0.5, 1.5, 5.0))
                .with_shapes([
                    Shape::cuboid(1.5, 0.5, 0.5),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(1.0, 0.0, -1.0),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(-1.0, 0.0, -1.0),
                    Shape::cuboid(0.5, 0.5, 0.5).offset(0.0, -1.0, 0.0),
                ])
                .with_color([1.0, 0.5, 0.0]),
        )?;

        let bullet = scene.spawn(
            ActorDesc::new("BULLET", ActorKind::Simulated, pose_from(BULLET_HOME))
                .with_shape(Shape::cuboid(0.5, 0.5, 0.5))
                .without_gravity()
                .with_color([0.0, 1.0, 0.0]),
        )?;

        Ok(Self {
            wall,
            compound,
            bullet,
            frames: 0,
        })
    }

    pub fn wall(&self) -> &[ActorId] {
        &self.wall
    }

    pub fn bullet(&self) -> ActorId {
        self.bullet
    }
}

impl SceneScript for BoxWallScript {
    fn name(&self) -> &str {
        "wall"
    }

    fn post_step(&mut self, scene: &mut Scene) -> Result<(), SceneError> {
        scene.dynamic(self.compound)?.add_force(SHOVE)?;

        let mut bullet = scene.dynamic(self.bullet)?;
        bullet.add_force(THRUST)?;
        self.frames += 1;
        if self.frames > BULLET_RELOAD {
            bullet.reset_to(pose_from(BULLET_HOME))?;
            self.frames = 0;
        }
        Ok(())
    }
}
