use crate::render::MinimapVertex;
use super::buffer::{VertexTrait, VertexElementDef};

// ----------------------------------------------
// Minimap Vertex
// ----------------------------------------------

impl VertexTrait for MinimapVertex {
    fn layout() -> Vec<VertexElementDef> {
        vec![
            // vec2 in_position
            VertexElementDef { count: 2, kind: gl::FLOAT },
            // vec2 in_tex_coords
            VertexElementDef { count: 2, kind: gl::FLOAT },
        ]
    }

    fn stride() -> usize { std::mem::size_of::<Self>() }
}
