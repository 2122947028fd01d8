use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(pub u64);

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "joint#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JointKind {
    /// Damped spring pulling the anchors towards `rest_length`
    Spring {
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    },
    /// Hinge about the local X axis, optionally limited and motor driven (rad/s)
    Revolute {
        limits: Option<(f32, f32)>,
        drive_velocity: f32,
    },
}

/// Connection between two actors. A missing first actor anchors to the world.
#[derive(Debug, Clone, PartialEq)]
pub struct JointDesc {
    pub first: Option<ActorId>,
    pub second: ActorId,
    /// Anchor in the first actor's frame, or in world space for a world anchor
    pub first_anchor: Point3<f32>,
    pub second_anchor: Point3<f32>,
    pub kind: JointKind,
}

impl JointDesc {
    pub fn spring(
        first: ActorId,
        first_anchor: Point3<f32>,
        second: ActorId,
        second_anchor: Point3<f32>,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            first: Some(first),
            second,
            first_anchor,
            second_anchor,
            kind: JointKind::Spring {
                rest_length,
                stiffness,
                damping,
            },
        }
    }

    pub fn revolute(
        first: Option<ActorId>,
        first_anchor: Point3<f32>,
        second: ActorId,
        second_anchor: Point3<f32>,
    ) -> Self {
        Self {
            first,
            second,
            first_anchor,
            second_anchor,
            kind: JointKind::Revolute {
                limits: None,
                drive_velocity: 0.0,
            },
        }
    }

    pub fn with_limits(mut self, lower: f32, upper: f32) -> Self {
        if let JointKind::Revolute { limits, .. } = &mut self.kind {
            *limits = Some((lower, upper));
        }
        self
    }

    pub fn involves(&self, actor: ActorId) -> bool {
        self.first == Some(actor) || self.second == actor
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.first == Some(self.second) {
            return Err(format!("{} cannot be jointed to itself", self.second));
        }
        match self.kind {
            JointKind::Spring {
                rest_length,
                stiffness,
                damping,
            } => {
                let values = [rest_length, stiffness, damping];
                if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(format!(
                        "spring parameters must be finite and non-negative: {values:?}"
                    ));
                }
            }
            JointKind::Revolute {
                limits: Some((lower, upper)),
                ..
            } if !(lower <= upper) => {
                return Err(format!("revolute limits out of order: {lower} > {upper}"));
            }
            JointKind::Revolute { .. } => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct JointRecord {
    pub id: JointId,
    pub desc: JointDesc,
}

impl JointRecord {
    /// Current motor target, for revolute joints
    pub fn drive_velocity(&self) -> Option<f32> {
        match self.desc.kind {
            JointKind::Revolute { drive_velocity, .. } => Some(drive_velocity),
            JointKind::Spring { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revolute_limits() {
        let joint = JointDesc::revolute(Some(ActorId(1)), Point3::origin(), ActorId(2), Point3::origin())
            .with_limits(-1.0, 1.0);
        assert!(joint.validate().is_ok());
        assert_eq!(
            joint.kind,
            JointKind::Revolute {
                limits: Some((-1.0, 1.0)),
                drive_velocity: 0.0,
            }
        );

        let reversed = joint.with_limits(1.0, -1.0);
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_spring_rejects_negative_stiffness() {
        let joint = JointDesc::spring(
            ActorId(1),
            Point3::origin(),
            ActorId(2),
            Point3::origin(),
            4.0,
            -100.0,
            0.5,
        );
        assert!(joint.validate().is_err());
    }

    #[test]
    fn test_self_joint_rejected() {
        let joint = JointDesc::revolute(Some(ActorId(3)), Point3::origin(), ActorId(3), Point3::origin());
        assert!(joint.validate().is_err());
    }

    #[test]
    fn test_involves() {
        let world = JointDesc::revolute(None, Point3::new(0.0, 0.0, -95.0), ActorId(5), Point3::origin());
        assert!(world.involves(ActorId(5)));
        assert!(!world.involves(ActorId(6)));
    }
}
