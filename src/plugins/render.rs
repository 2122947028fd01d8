use bevy::math::Isometry3d;
use bevy::prelude::*;
use nalgebra::{Isometry3, Point3};
use std::f32::consts::FRAC_PI_2;
use std::marker::PhantomData;

use crate::components::{Geometry, RenderItem};
use crate::scene::{SceneScript, SimulationEngine};
use crate::utils::deg_to_rad;

/// Half-size of the grid drawn for ground planes, in cells
const GROUND_CELLS: u32 = 60;

/// Draws every actor of the engine's scene as wireframe gizmos
pub struct GizmoRenderPlugin<S> {
    /// Vertical field of view in degrees
    pub fov: f32,
    _script: PhantomData<fn() -> S>,
}

impl<S> GizmoRenderPlugin<S> {
    pub fn new(fov: f32) -> Self {
        Self {
            fov,
            _script: PhantomData,
        }
    }
}

#[derive(Resource, Clone, Copy)]
struct CameraFov(f32);

impl<S: SceneScript> Plugin for GizmoRenderPlugin<S> {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.5, 0.7, 1.0)))
            .insert_resource(CameraFov(self.fov))
            .add_systems(Startup, spawn_camera)
            .add_systems(PostUpdate, draw_scene_system::<S>);
    }
}

fn spawn_camera(mut commands: Commands, fov: Res<CameraFov>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: deg_to_rad(fov.0),
            ..default()
        }),
        Transform::from_xyz(0.0, 35.0, 40.0).looking_at(Vec3::new(0.0, 5.0, -50.0), Vec3::Y),
    ));
}

pub fn to_vec3(point: &Point3<f32>) -> Vec3 {
    Vec3::new(point.x, point.y, point.z)
}

/// nalgebra pose to a bevy transform with unit scale
pub fn to_transform(pose: &Isometry3<f32>) -> Transform {
    let t = pose.translation.vector;
    let q = pose.rotation.quaternion();
    Transform {
        translation: Vec3::new(t.x, t.y, t.z),
        rotation: Quat::from_xyzw(q.i, q.j, q.k, q.w),
        scale: Vec3::ONE,
    }
}

fn to_isometry(transform: &Transform) -> Isometry3d {
    Isometry3d::new(transform.translation, transform.rotation)
}

fn draw_scene_system<S: SceneScript>(engine: Res<SimulationEngine<S>>, mut gizmos: Gizmos) {
    for item in engine.scene().render_list() {
        draw_item(&mut gizmos, &item);
    }
}

fn draw_item(gizmos: &mut Gizmos, item: &RenderItem) {
    let [r, g, b] = item.color;
    let color = Color::srgb(r, g, b);

    for shape in &item.shapes {
        let world = item.pose * shape.local_pose;
        let transform = to_transform(&world);

        match &shape.geometry {
            Geometry::Box { half_extents } => {
                let size = Vec3::new(half_extents.x, half_extents.y, half_extents.z) * 2.0;
                gizmos.cuboid(transform.with_scale(size), color);
            }
            Geometry::Sphere { radius } => {
                gizmos.sphere(to_isometry(&transform), *radius, color);
            }
            Geometry::Capsule {
                radius,
                half_length,
            } => {
                // Capsule3d runs along Y, ours along X
                let along_x = transform.with_rotation(
                    transform.rotation * Quat::from_rotation_z(-FRAC_PI_2),
                );
                gizmos.primitive_3d(
                    &Capsule3d::new(*radius, half_length * 2.0),
                    to_isometry(&along_x),
                    color,
                );
            }
            Geometry::ConvexHull { points } => {
                for (i, a) in points.iter().enumerate() {
                    for b in &points[i + 1..] {
                        gizmos.line(
                            transform.transform_point(to_vec3(a)),
                            transform.transform_point(to_vec3(b)),
                            color,
                        );
                    }
                }
            }
            Geometry::Mesh { points, triangles } => {
                for triangle in triangles {
                    let corners = triangle.map(|index| {
                        transform.transform_point(to_vec3(&points[index as usize]))
                    });
                    gizmos.linestrip(
                        [corners[0], corners[1], corners[2], corners[0]],
                        color,
                    );
                }
            }
            Geometry::Plane => {
                let flat = transform.with_rotation(
                    transform.rotation * Quat::from_rotation_x(-FRAC_PI_2),
                );
                gizmos.grid(
                    to_isometry(&flat),
                    UVec2::splat(GROUND_CELLS * 2),
                    Vec2::splat(5.0),
                    color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn test_transform_matches_pose() {
        let pose = Isometry3::from_parts(
            Vector3::new(1.0, 2.0, 3.0).into(),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.5),
        );
        let transform = to_transform(&pose);

        let local = Point3::new(1.0, 0.0, 0.0);
        let expected = pose * local;
        let actual = transform.transform_point(to_vec3(&local));
        assert!((actual - to_vec3(&expected)).length() < 1e-5);
    }
}
