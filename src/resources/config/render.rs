use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub title: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub vsync: bool,
    /// Degrees
    pub fov: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Medieval Rugby".to_string(),
            screen_width: 800,
            screen_height: 800,
            vsync: true,
            fov: 60.0,
        }
    }
}
