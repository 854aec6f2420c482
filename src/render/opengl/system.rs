use slab::Slab;

use crate::{
    log,
    render::{
        self,
        MinimapIndex,
        MinimapPassHandle,
        MinimapTextures,
        MinimapUniforms,
        MinimapVertex,
        RenderStats,
        TextureCache as _,
    },
    utils::{Color, Size}
};

use super::{
    panic_if_gl_error,
    shader::minimap,
    context::*,
    buffer::{BufferUsageHint, IndexBuffer, VertexArray, VertexBuffer, VertexTrait},
    texture::{TextureCache, TextureUnit},
};

const MAP_TEXTURE_UNIT: TextureUnit = TextureUnit(0);
const TRAIL_TEXTURE_UNIT: TextureUnit = TextureUnit(1);

// ----------------------------------------------
// MinimapPass
// ----------------------------------------------

struct MinimapPass {
    shader: minimap::Shader,
    vertex_array: VertexArray,
}

// ----------------------------------------------
// RenderSystem
// ----------------------------------------------

pub struct RenderSystem {
    frame_started: bool,
    render_context: RenderContext,
    minimap_passes: Slab<MinimapPass>,
    stats: RenderStats,
    viewport_size: Size,
    tex_cache: TextureCache,
}

impl RenderSystem {
    pub fn new(viewport_size: Size, clear_color: Color) -> Self {
        debug_assert!(viewport_size.is_valid());

        let mut render_sys = Self {
            frame_started: false,
            render_context: RenderContext::new(),
            minimap_passes: Slab::new(),
            stats: RenderStats::default(),
            viewport_size,
            tex_cache: TextureCache::new(16),
        };

        render_sys.render_context
            .set_clear_color(clear_color)
            .set_alpha_blend(AlphaBlend::Enabled)
            // Screen-space overlay only, no depth test or back-face culling.
            .set_backface_culling(BackFaceCulling::Disabled)
            .set_depth_test(DepthTest::Disabled)
            .set_viewport(viewport_size);

        render_sys
    }
}

impl render::RenderSystem for RenderSystem {
    fn begin_frame(&mut self) {
        debug_assert!(!self.frame_started);

        self.render_context.begin_frame();
        self.frame_started = true;

        self.stats.triangles_drawn = 0;
        self.stats.texture_changes = 0;
        self.stats.draw_calls      = 0;
    }

    fn end_frame(&mut self) -> RenderStats {
        debug_assert!(self.frame_started);

        self.stats.texture_changes = self.render_context.texture_changes();
        self.stats.draw_calls      = self.render_context.draw_calls();

        self.render_context.end_frame();
        self.frame_started = false;

        self.stats.peak_triangles_drawn = self.stats.triangles_drawn.max(self.stats.peak_triangles_drawn);
        self.stats.peak_texture_changes = self.stats.texture_changes.max(self.stats.peak_texture_changes);
        self.stats.peak_draw_calls      = self.stats.draw_calls.max(self.stats.peak_draw_calls);

        self.stats
    }

    #[inline]
    fn texture_cache(&self) -> &dyn render::TextureCache {
        &self.tex_cache
    }

    #[inline]
    fn texture_cache_mut(&mut self) -> &mut dyn render::TextureCache {
        &mut self.tex_cache
    }

    #[inline]
    fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    fn set_viewport_size(&mut self, new_size: Size) {
        if !new_size.is_valid() {
            return; // Minimized window.
        }
        self.viewport_size = new_size;
        self.render_context.set_viewport(new_size);
    }

    fn new_minimap_pass(&mut self,
                        vertices: &[MinimapVertex],
                        indices: &[MinimapIndex]) -> Result<MinimapPassHandle, String> {

        if vertices.is_empty() || indices.is_empty() {
            return Err("Minimap pass needs at least one vertex and one index".to_string());
        }

        let shader = minimap::Shader::load()?;

        let vertex_array = VertexArray::new(
            VertexBuffer::with_data(vertices, BufferUsageHint::StaticDraw),
            IndexBuffer::with_data(indices, BufferUsageHint::StaticDraw),
            &MinimapVertex::layout(),
            MinimapVertex::stride());

        if cfg!(debug_assertions) {
            panic_if_gl_error();
        }

        log::verbose!(log::channel!("render"),
                      "Created minimap pass ({} vertices, {} indices)",
                      vertex_array.vertex_count(), vertex_array.index_count());

        let index = self.minimap_passes.insert(MinimapPass { shader, vertex_array });

        Ok(MinimapPassHandle::Index(index as u32))
    }

    fn release_minimap_pass(&mut self, pass: &mut MinimapPassHandle) {
        if let MinimapPassHandle::Index(index) = *pass {
            // Dropping the pass deletes the program, buffers and vertex array.
            if self.minimap_passes.try_remove(index as usize).is_some() {
                log::verbose!(log::channel!("render"), "Released minimap pass #{index}");
            }
        }
        *pass = MinimapPassHandle::invalid();
    }

    fn draw_minimap_pass(&mut self,
                         pass: MinimapPassHandle,
                         textures: MinimapTextures,
                         uniforms: &MinimapUniforms) {

        debug_assert!(self.frame_started);

        let MinimapPassHandle::Index(index) = pass else {
            return;
        };

        let Some(minimap_pass) = self.minimap_passes.get(index as usize) else {
            return;
        };

        let map_texture = textures.heightmap.bits as gl::types::GLuint;
        let trail_texture = self.tex_cache.to_native_handle(textures.trail).bits as gl::types::GLuint;

        let shader = &minimap_pass.shader;
        shader.set_map_offset(uniforms.map_offset);
        shader.set_rotation_angle(uniforms.rotation_angle);
        shader.set_overlay_alpha(uniforms.overlay_alpha);
        shader.set_map_texture(MAP_TEXTURE_UNIT);
        shader.set_trail_texture(TRAIL_TEXTURE_UNIT);

        self.render_context
            .set_shader_program(&shader.program)
            .set_texture_2d(map_texture, MAP_TEXTURE_UNIT)
            .set_texture_2d(trail_texture, TRAIL_TEXTURE_UNIT)
            .draw_vertex_array(&minimap_pass.vertex_array);

        // Leave texture unit 0 active for whoever draws next.
        self.render_context.unset_all_textures();
        self.render_context.unset_shader_program();

        self.stats.triangles_drawn += minimap_pass.vertex_array.index_count() / 3;
    }
}
