use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::f32::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// Pose with no rotation at the given position
#[inline]
pub fn pose_at(x: f32, y: f32, z: f32) -> Isometry3<f32> {
    Isometry3::translation(x, y, z)
}

#[inline]
pub fn pose_from(position: Vector3<f32>) -> Isometry3<f32> {
    Isometry3::from_parts(Translation3::from(position), UnitQuaternion::identity())
}

/// Pose at a position, rotated about the vertical axis
pub fn pose_with_yaw(position: Vector3<f32>, yaw: f32) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::from(position),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw),
    )
}

/// Pose whose translation is `pose`'s shifted by `offset`, with the rotation dropped.
///
/// Scripted placements (ball on the throw arm, debris under the ball) only
/// follow position.
pub fn offset_translation(pose: &Isometry3<f32>, offset: Vector3<f32>) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::from(pose.translation.vector + offset),
        UnitQuaternion::identity(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_relative_eq!(deg_to_rad(180.0), PI);
        assert_relative_eq!(deg_to_rad(90.0), PI / 2.0);
    }

    #[test]
    fn test_pose_with_yaw_keeps_position() {
        let pose = pose_with_yaw(Vector3::new(1.0, 2.0, 3.0), PI);
        assert_relative_eq!(pose.translation.vector, Vector3::new(1.0, 2.0, 3.0));
        let forward = pose.rotation * Vector3::z();
        assert_relative_eq!(forward, -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_offset_translation_drops_rotation() {
        let pose = pose_with_yaw(Vector3::new(0.0, 5.5, -1.0), 0.3);
        let shifted = offset_translation(&pose, Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(shifted.translation.vector, Vector3::new(0.0, 6.5, -1.0));
        assert_eq!(shifted.rotation, UnitQuaternion::identity());
    }
}
