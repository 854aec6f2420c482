use crate::utils::{Size, Vec2, Vec3};

// ----------------------------------------------
// SimulationView
// ----------------------------------------------

// The slice of simulation state the minimap reads every frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationView {
    pub plane_position: Vec3,
    pub plane_front: Vec3,
    pub is_crashed: bool,
    pub terrain_size: Size, // World units, centered on the origin.
}

// Maps world X/Z into [0,1] across the terrain. Not clamped, so
// positions past the terrain edge go outside the unit square.
pub fn normalized_map_position(world_pos: Vec3, terrain_size: Size) -> Vec2 {
    let total_width = terrain_size.width as f32;
    let total_height = terrain_size.height as f32;
    Vec2::new(
        (world_pos.x + total_width / 2.0) / total_width,
        (world_pos.z + total_height / 2.0) / total_height,
    )
}

// Heading angle in radians. Facing -Z is zero; facing +X is -pi/2.
#[inline]
pub fn heading_from_front(front: Vec3) -> f32 {
    (-front.x).atan2(-front.z)
}

// ----------------------------------------------
// FrameState
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameState {
    pub map_offset: Vec2, // Normalized position minus the map center.
    pub heading: f32,
}

impl FrameState {
    pub fn from_view(view: &SimulationView) -> Self {
        let map_pos = normalized_map_position(view.plane_position, view.terrain_size);
        Self {
            map_offset: map_pos - Vec2::splat(0.5),
            heading: heading_from_front(view.plane_front),
        }
    }
}
