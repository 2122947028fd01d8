use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::physics::{FilterTag, PhysicsError};
use crate::utils::DEFAULT_DENSITY;

/// Stable handle for an actor owned by a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Never moves once constructed
    Static,
    /// Moved only by scripted pose updates, pushes simulated bodies around
    Kinematic,
    /// Moved only by the solver
    Simulated,
}

impl ActorKind {
    pub fn is_dynamic(self) -> bool {
        !matches!(self, ActorKind::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box { half_extents: Vector3<f32> },
    Sphere { radius: f32 },
    /// Capsule lying along the local X axis
    Capsule { radius: f32, half_length: f32 },
    ConvexHull { points: Vec<Point3<f32>> },
    Mesh {
        points: Vec<Point3<f32>>,
        triangles: Vec<[u32; 3]>,
    },
    /// Infinite plane with its normal along local +Y
    Plane,
}

impl Geometry {
    pub fn is_plane(&self) -> bool {
        matches!(self, Geometry::Plane)
    }

    /// Checks the geometry can be handed to the solver, returning the reason when not.
    pub fn validate(&self) -> Result<(), String> {
        let positive = |value: f32, what: &str| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(format!("{what} must be positive and finite, got {value}"))
            }
        };

        match self {
            Geometry::Box { half_extents } => {
                for value in half_extents.iter() {
                    positive(*value, "box half extent")?;
                }
                Ok(())
            }
            Geometry::Sphere { radius } => positive(*radius, "sphere radius"),
            Geometry::Capsule {
                radius,
                half_length,
            } => {
                positive(*radius, "capsule radius")?;
                positive(*half_length, "capsule half length")
            }
            Geometry::ConvexHull { points } => validate_hull(points),
            Geometry::Mesh { points, triangles } => validate_mesh(points, triangles),
            Geometry::Plane => Ok(()),
        }
    }
}

fn validate_hull(points: &[Point3<f32>]) -> Result<(), String> {
    if points.len() < 4 {
        return Err(format!(
            "convex hull needs at least 4 points, got {}",
            points.len()
        ));
    }
    if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err("convex hull contains non-finite points".to_string());
    }

    let origin = points[0];
    let Some(edge) = points
        .iter()
        .map(|p| p - origin)
        .find(|v| v.norm() > f32::EPSILON)
    else {
        return Err("convex hull points are all coincident".to_string());
    };
    let Some(normal) = points
        .iter()
        .map(|p| edge.cross(&(p - origin)))
        .find(|n| n.norm() > 1e-6)
    else {
        return Err("convex hull points are collinear".to_string());
    };
    let normal = normal.normalize();

    if points
        .iter()
        .all(|p| normal.dot(&(p - origin)).abs() <= 1e-6)
    {
        return Err("convex hull points are coplanar".to_string());
    }
    Ok(())
}

fn validate_mesh(points: &[Point3<f32>], triangles: &[[u32; 3]]) -> Result<(), String> {
    if points.len() < 3 || triangles.is_empty() {
        return Err("triangle mesh needs at least 3 points and one triangle".to_string());
    }
    for (i, triangle) in triangles.iter().enumerate() {
        if triangle.iter().any(|&index| index as usize >= points.len()) {
            return Err(format!("triangle {i} references a missing vertex"));
        }
        if triangle[0] == triangle[1] || triangle[1] == triangle[2] || triangle[0] == triangle[2] {
            return Err(format!("triangle {i} is degenerate"));
        }
    }
    Ok(())
}

/// One collision shape attached to an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: Geometry,
    /// Pose relative to the owning actor
    pub local_pose: Isometry3<f32>,
    /// Takes part in contact resolution
    pub simulation: bool,
    /// Reports overlaps instead of colliding
    pub trigger: bool,
}

impl Shape {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            local_pose: Isometry3::identity(),
            simulation: true,
            trigger: false,
        }
    }

    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::new(Geometry::Box {
            half_extents: Vector3::new(hx, hy, hz),
        })
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(Geometry::Sphere { radius })
    }

    pub fn capsule(radius: f32, half_length: f32) -> Self {
        Self::new(Geometry::Capsule {
            radius,
            half_length,
        })
    }

    pub fn plane() -> Self {
        Self::new(Geometry::Plane)
    }

    pub fn convex_hull(points: Vec<Point3<f32>>) -> Self {
        Self::new(Geometry::ConvexHull { points })
    }

    pub fn mesh(points: Vec<Point3<f32>>, triangles: Vec<[u32; 3]>) -> Self {
        Self::new(Geometry::Mesh { points, triangles })
    }

    pub fn at(mut self, local_pose: Isometry3<f32>) -> Self {
        self.local_pose = local_pose;
        self
    }

    pub fn offset(self, x: f32, y: f32, z: f32) -> Self {
        self.at(Isometry3::translation(x, y, z))
    }

    /// Turns the shape into an overlap-only trigger volume.
    pub fn as_trigger(mut self) -> Self {
        self.simulation = false;
        self.trigger = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Material {
    pub const DEFAULT: Material = Material::new(0.1, 0.1, 0.5);
    pub const GRASS: Material = Material::new(0.1, 0.1, 0.5);
    pub const RUGBY_BALL: Material = Material::new(0.1, 0.1, 1.2);
    pub const CATAPULT: Material = Material::new(0.2, 0.3, 0.6);
    pub const TRAMPOLINE: Material = Material::new(0.1, 0.1, 1.0);
    pub const WALL: Material = Material::new(0.1, 0.1, 0.2);

    pub const fn new(static_friction: f32, dynamic_friction: f32, restitution: f32) -> Self {
        Self {
            static_friction,
            dynamic_friction,
            restitution,
        }
    }

    /// Single Coulomb coefficient for solvers that do not split sticking
    /// from sliding friction: the mean of the two.
    pub fn combined_friction(&self) -> f32 {
        0.5 * (self.static_friction + self.dynamic_friction)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Linear RGB, each channel in [0, 1]
pub type Color = [f32; 3];

/// Everything needed to create an actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorDesc {
    pub name: String,
    pub kind: ActorKind,
    pub pose: Isometry3<f32>,
    pub shapes: Vec<Shape>,
    pub material: Material,
    pub density: f32,
    pub gravity: bool,
    pub filter: FilterTag,
    pub color: Color,
}

impl ActorDesc {
    pub fn new(name: impl Into<String>, kind: ActorKind, pose: Isometry3<f32>) -> Self {
        Self {
            name: name.into(),
            kind,
            pose,
            shapes: Vec::new(),
            material: Material::DEFAULT,
            density: DEFAULT_DENSITY,
            gravity: true,
            filter: FilterTag::default(),
            color: [0.8, 0.8, 0.8],
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = Shape>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.gravity = false;
        self
    }

    pub fn with_filter(mut self, filter: FilterTag) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.shapes.iter().any(|shape| shape.trigger)
    }

    /// Geometry checks done before anything reaches the solver.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let fail = |reason: String| PhysicsError::CookingFailed {
            actor: self.name.clone(),
            reason,
        };

        if self.shapes.is_empty() {
            return Err(fail("actor has no shapes".to_string()));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(fail(format!("invalid density {}", self.density)));
        }
        for shape in &self.shapes {
            shape.geometry.validate().map_err(fail)?;
            let static_only = matches!(shape.geometry, Geometry::Plane | Geometry::Mesh { .. });
            if static_only && self.kind != ActorKind::Static {
                return Err(fail(
                    "planes and triangle meshes can only belong to static actors".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Requested during event dispatch, created at the next step boundary
    Pending,
    Live,
}

#[derive(Debug, Clone)]
pub struct ActorRecord {
    pub id: ActorId,
    pub desc: ActorDesc,
    pub lifecycle: Lifecycle,
}

impl ActorRecord {
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn kind(&self) -> ActorKind {
        self.desc.kind
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Live
    }

    pub fn is_plane(&self) -> bool {
        self.desc
            .shapes
            .iter()
            .all(|shape| shape.geometry.is_plane())
    }
}
