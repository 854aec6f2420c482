use bitflags::bitflags;
use strum_macros::{Display, VariantArray};

use crate::{
    utils::{Color, Size, Vec2}
};

// Internal implementation.
mod opengl;
pub mod backend {
    use super::*;
    pub type RenderSystemOpenGl = opengl::system::RenderSystem;
    pub type TextureCacheOpenGl = opengl::texture::TextureCache;
}

// ----------------------------------------------
// RenderStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default)]
pub struct RenderStats {
    // Current frame totals:
    pub triangles_drawn: u32,
    pub texture_changes: u32,
    pub draw_calls: u32,
    // Peaks for the whole run:
    pub peak_triangles_drawn: u32,
    pub peak_texture_changes: u32,
    pub peak_draw_calls: u32,
}

// ----------------------------------------------
// RenderSystem
// ----------------------------------------------

pub trait RenderSystem {
    // ----------------------
    // Render frame markers:
    // ----------------------

    fn begin_frame(&mut self);
    fn end_frame(&mut self) -> RenderStats;

    // ----------------------
    // TextureCache access:
    // ----------------------

    fn texture_cache(&self) -> &dyn TextureCache;
    fn texture_cache_mut(&mut self) -> &mut dyn TextureCache;

    // ----------------------
    // Viewport:
    // ----------------------

    fn viewport_size(&self) -> Size;
    fn set_viewport_size(&mut self, new_size: Size);

    // ----------------------
    // Minimap pass:
    // ----------------------

    // Compiles the minimap compositing shader and uploads the static quad.
    fn new_minimap_pass(&mut self,
                        vertices: &[MinimapVertex],
                        indices: &[MinimapIndex]) -> Result<MinimapPassHandle, String>;

    // Releases the pass and resets `pass` to the invalid handle.
    // Releasing an invalid handle is a no-op.
    fn release_minimap_pass(&mut self, pass: &mut MinimapPassHandle);

    // One indexed draw of the minimap quad. The active texture
    // unit is restored to unit 0 before returning.
    fn draw_minimap_pass(&mut self,
                         pass: MinimapPassHandle,
                         textures: MinimapTextures,
                         uniforms: &MinimapUniforms);
}

// ----------------------------------------------
// RenderSystemBuilder
// ----------------------------------------------

pub struct RenderSystemBuilder {
    viewport_size: Size,
    clear_color: Color,
}

impl RenderSystemBuilder {
    pub fn new() -> Self {
        Self {
            viewport_size: Size::new(1024, 768),
            clear_color: Color::black(),
        }
    }

    pub fn viewport_size(&mut self, size: Size) -> &mut Self {
        self.viewport_size = size;
        self
    }

    pub fn clear_color(&mut self, color: Color) -> &mut Self {
        self.clear_color = color;
        self
    }

    // Requires a current OpenGL context with the GL functions already loaded.
    pub fn build(&self) -> backend::RenderSystemOpenGl {
        backend::RenderSystemOpenGl::new(self.viewport_size, self.clear_color)
    }
}

// ----------------------------------------------
// Minimap pass types
// ----------------------------------------------

pub type MinimapIndex = u16;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MinimapVertex {
    pub position: Vec2,   // X,Y in normalized device coordinates.
    pub tex_coords: Vec2, // U,V
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MinimapPassHandle {
    #[default]
    Invalid,
    Index(u32),
}

impl MinimapPassHandle {
    #[inline]
    pub const fn invalid() -> Self {
        MinimapPassHandle::Invalid
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, MinimapPassHandle::Invalid)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct MinimapTextures {
    // Owned by the host; sampled with texcoord + map offset.
    pub heightmap: NativeTextureHandle,
    // Sampled with the rotated texcoord.
    pub trail: TextureHandle,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MinimapUniforms {
    pub map_offset: Vec2,
    pub rotation_angle: f32,
    pub overlay_alpha: f32,
}

// ----------------------------------------------
// TextureHandle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureHandle {
    #[default]
    Invalid,
    Index(u32), // Index into TextureCache array of textures.
}

impl TextureHandle {
    #[inline]
    pub const fn invalid() -> Self {
        TextureHandle::Invalid
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, TextureHandle::Invalid)
    }
}

// Raw backend texture name (GLuint for OpenGL).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeTextureHandle {
    pub bits: usize,
}

// ----------------------------------------------
// TextureSettings
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, VariantArray)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, VariantArray)]
pub enum TextureWrapMode {
    Repeat,
    ClampToEdge,
}

#[derive(Copy, Clone, Debug)]
pub struct TextureSettings {
    pub filter: TextureFilter,
    pub wrap_mode: TextureWrapMode,
    pub gen_mipmaps: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            filter: TextureFilter::Linear,
            wrap_mode: TextureWrapMode::ClampToEdge,
            gen_mipmaps: false,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct TextureLoaderFlags: u32 {
        const FlipV = 1 << 0;
        const FlipH = 1 << 1;
    }
}

// ----------------------------------------------
// TextureCache
// ----------------------------------------------

pub trait TextureCache {
    fn load_texture(&mut self,
                    file_path: &str,
                    flags: TextureLoaderFlags,
                    settings: TextureSettings) -> Result<TextureHandle, String>;

    // `pixels` are tightly packed RGBA8, `size.width * size.height * 4` bytes.
    fn new_texture_with_pixels(&mut self,
                               debug_name: &str,
                               size: Size,
                               pixels: &[u8],
                               settings: TextureSettings) -> TextureHandle;

    // Releases the texture and resets `handle` to the invalid handle.
    fn release_texture(&mut self, handle: &mut TextureHandle);

    fn to_native_handle(&self, handle: TextureHandle) -> NativeTextureHandle;
}
