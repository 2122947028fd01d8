use nalgebra::Isometry3;

use crate::components::{ActorKind, Color, Shape};

/// What the renderer needs to draw one actor
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub name: String,
    pub kind: ActorKind,
    pub pose: Isometry3<f32>,
    pub shapes: Vec<Shape>,
    pub color: Color,
}
