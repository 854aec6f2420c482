use crate::{
    log,
    render::{
        MinimapPassHandle,
        MinimapTextures,
        MinimapUniforms,
        NativeTextureHandle,
        RenderSystem,
        TextureFilter,
        TextureHandle,
        TextureSettings,
        TextureWrapMode,
    },
};

pub mod config;
pub mod geometry;
pub mod icon;
pub mod pixels;
pub mod quad;
pub mod state;

use config::MinimapConfigs;
use icon::IconShape;
use pixels::TrailBuffer;
use quad::MinimapQuad;
use state::{FrameState, SimulationView};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// MinimapOverlay
// ----------------------------------------------

// Top-right overlay showing the terrain heightmap panned under a fixed
// player icon that rotates with the plane heading.
pub struct MinimapOverlay {
    configs: MinimapConfigs,
    quad: MinimapQuad,
    pass: MinimapPassHandle,
    trail_texture: TextureHandle,
    trail_buffer: Option<TrailBuffer>,
    frame: FrameState,
}

impl MinimapOverlay {
    pub fn new(configs: MinimapConfigs) -> Self {
        let quad = MinimapQuad::new(&configs);
        Self {
            configs,
            quad,
            pass: MinimapPassHandle::invalid(),
            trail_texture: TextureHandle::invalid(),
            trail_buffer: None,
            frame: FrameState::default(),
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.pass.is_valid()
    }

    // Creates the GPU pass and bakes the player icon into the trail texture.
    // Calling it again on an initialized overlay does nothing.
    pub fn init(&mut self, render_sys: &mut dyn RenderSystem) -> Result<(), String> {
        if self.is_initialized() {
            log::verbose!(log::channel!("minimap"), "Minimap already initialized.");
            return Ok(());
        }

        let pass = render_sys.new_minimap_pass(&self.quad.vertices, &self.quad.indices)?;

        let mut trail_buffer = TrailBuffer::new();
        let icon = IconShape::new(&self.configs);
        let icon_pixels = icon.rasterize(&mut trail_buffer, TrailBuffer::center(), 0.0);

        let settings = TextureSettings {
            filter: TextureFilter::Linear,
            wrap_mode: TextureWrapMode::ClampToEdge,
            gen_mipmaps: false,
        };

        self.trail_texture = render_sys.texture_cache_mut().new_texture_with_pixels(
            "minimap_trail",
            TrailBuffer::size(),
            trail_buffer.as_bytes(),
            settings);

        self.pass = pass;
        self.trail_buffer = Some(trail_buffer);

        log::info!(log::channel!("minimap"),
                   "Minimap initialized: trail texture {}, {icon_pixels} icon pixels.",
                   TrailBuffer::size());

        Ok(())
    }

    // Recomputes the map offset and heading. Frozen while crashed.
    pub fn update(&mut self, view: &SimulationView) {
        if view.is_crashed || !view.terrain_size.is_valid() {
            return;
        }
        self.frame = FrameState::from_view(view);
    }

    // No-op until initialized.
    pub fn draw(&self, render_sys: &mut dyn RenderSystem, heightmap: NativeTextureHandle) {
        if !self.is_initialized() {
            return;
        }

        let textures = MinimapTextures {
            heightmap,
            trail: self.trail_texture,
        };

        let uniforms = MinimapUniforms {
            map_offset: self.frame.map_offset,
            rotation_angle: self.frame.heading,
            overlay_alpha: self.configs.transparency,
        };

        render_sys.draw_minimap_pass(self.pass, textures, &uniforms);
    }

    // Releases GPU resources and the CPU trail copy. Safe to call repeatedly,
    // and `init` may be called again afterwards.
    pub fn cleanup(&mut self, render_sys: &mut dyn RenderSystem) {
        if !self.is_initialized() && !self.trail_texture.is_valid() && self.trail_buffer.is_none() {
            log::verbose!(log::channel!("minimap"), "Minimap already clean.");
            return;
        }

        render_sys.release_minimap_pass(&mut self.pass);
        render_sys.texture_cache_mut().release_texture(&mut self.trail_texture);
        self.trail_buffer = None;

        log::info!(log::channel!("minimap"), "Minimap resources released.");
    }

    // Nothing to reset; `update` rebuilds the frame state every frame.
    pub fn reset_for_restart(&mut self) {
    }

    #[inline]
    pub fn quad(&self) -> &MinimapQuad {
        &self.quad
    }

    #[inline]
    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    #[inline]
    pub fn pass_handle(&self) -> MinimapPassHandle {
        self.pass
    }

    #[inline]
    pub fn trail_texture(&self) -> TextureHandle {
        self.trail_texture
    }

    // CPU copy of the baked trail sprite, while initialized.
    #[inline]
    pub fn trail_buffer(&self) -> Option<&TrailBuffer> {
        self.trail_buffer.as_ref()
    }
}
