use crate::{
    render::{MinimapIndex, MinimapVertex},
    utils::Vec2,
};

use super::config::MinimapConfigs;

// ----------------------------------------------
// MinimapQuad
// ----------------------------------------------

// Screen-space rectangle hanging down and left from the anchor point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinimapQuad {
    pub vertices: [MinimapVertex; 4],
    pub indices: [MinimapIndex; 6],
}

impl MinimapQuad {
    pub fn new(configs: &MinimapConfigs) -> Self {
        let anchor = configs.anchor;
        let size = configs.quad_size();

        let vertex = |x: f32, y: f32, u: f32, v: f32| MinimapVertex {
            position: Vec2::new(x, y),
            tex_coords: Vec2::new(u, v),
        };

        Self {
            vertices: [
                vertex(anchor.x - size.x, anchor.y,          0.0, 0.0), // top-left
                vertex(anchor.x - size.x, anchor.y - size.y, 0.0, 1.0), // bottom-left
                vertex(anchor.x,          anchor.y - size.y, 1.0, 1.0), // bottom-right
                vertex(anchor.x,          anchor.y,          1.0, 0.0), // top-right
            ],
            indices: [
                0, 1, 2, // first triangle
                0, 2, 3, // second triangle
            ],
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
