use serde::{Serialize, Deserialize};

use crate::{
    config::Configs,
    utils::{Color, Vec2},
};

// ----------------------------------------------
// MinimapConfigs
// ----------------------------------------------

pub const MINIMAP_CONFIGS_FILE_NAME: &str = "minimap";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from MinimapConfigs::default().
pub struct MinimapConfigs {
    // Overlay quad, normalized device coordinates:
    pub size_scale: f32,
    pub anchor: Vec2, // Top-right corner of the quad.
    pub base_size: Vec2,
    pub transparency: f32,

    // Player icon, in trail texture pixels:
    pub icon_size: f32,
    pub feather_width: f32,
    pub nose_radius: f32,
    pub tail_radius: f32,
    pub fuselage_width_ratio: f32,

    // Player icon colors:
    pub fuselage_color: Color,
    pub fuselage_shade_color: Color,
    pub wing_color: Color,
    pub cockpit_color: Color,
    pub thruster_color: Color,
    pub outline_color: Color,
}

impl MinimapConfigs {
    // Final quad width & height in NDC.
    pub fn quad_size(&self) -> Vec2 {
        self.base_size * self.size_scale
    }
}

impl Default for MinimapConfigs {
    fn default() -> Self {
        Self {
            size_scale: 2.0,
            anchor: Vec2::new(0.95, 0.95),
            base_size: Vec2::new(0.25, 0.30),
            transparency: 0.8,

            icon_size: 15.0,
            feather_width: 1.0,
            nose_radius: 3.5,
            tail_radius: 4.0,
            fuselage_width_ratio: 0.2,

            fuselage_color: Color::rgb(0.7, 0.75, 0.8),
            fuselage_shade_color: Color::rgb(0.4, 0.45, 0.5),
            wing_color: Color::rgb(0.0, 0.8, 0.3),
            cockpit_color: Color::rgb(0.2, 0.9, 1.0),
            thruster_color: Color::rgb(1.0, 0.5, 0.1),
            outline_color: Color::rgb(0.1, 0.1, 0.15),
        }
    }
}

impl Configs for MinimapConfigs {
    fn post_load(&mut self) {
        // Keep the rasterizer well defined for hand-edited files.
        self.feather_width = self.feather_width.max(f32::EPSILON);
        self.icon_size = self.icon_size.max(0.0);
        self.nose_radius = self.nose_radius.max(0.0);
        self.tail_radius = self.tail_radius.max(0.0);
        self.transparency = self.transparency.clamp(0.0, 1.0);
    }
}
