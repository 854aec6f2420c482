use std::f32::consts::FRAC_PI_2;
use slab::Slab;

use super::*;
use crate::{
    config::Configs,
    render::{
        MinimapIndex,
        MinimapVertex,
        RenderStats,
        TextureCache,
        TextureLoaderFlags,
    },
    utils::{approx_equal, Size, Vec2, Vec3},
};

// ----------------------------------------------
// Recording RenderSystem (no GL context)
// ----------------------------------------------

struct FakeTexture {
    size: Size,
    pixels: Vec<u8>,
    settings: TextureSettings,
}

#[derive(Default)]
struct FakeTextureCache {
    textures: Slab<FakeTexture>,
    created_count: u32,
    released_count: u32,
}

impl TextureCache for FakeTextureCache {
    fn load_texture(&mut self,
                    file_path: &str,
                    _flags: TextureLoaderFlags,
                    _settings: TextureSettings) -> Result<TextureHandle, String> {
        Err(format!("No file system in tests: {file_path}"))
    }

    fn new_texture_with_pixels(&mut self,
                               _debug_name: &str,
                               size: Size,
                               pixels: &[u8],
                               settings: TextureSettings) -> TextureHandle {
        self.created_count += 1;
        let index = self.textures.insert(FakeTexture { size, pixels: pixels.to_vec(), settings });
        TextureHandle::Index(index as u32)
    }

    fn release_texture(&mut self, handle: &mut TextureHandle) {
        if let TextureHandle::Index(index) = *handle {
            if self.textures.try_remove(index as usize).is_some() {
                self.released_count += 1;
            }
        }
        *handle = TextureHandle::invalid();
    }

    fn to_native_handle(&self, handle: TextureHandle) -> NativeTextureHandle {
        match handle {
            TextureHandle::Index(index) => NativeTextureHandle { bits: index as usize + 100 },
            TextureHandle::Invalid => NativeTextureHandle::default(),
        }
    }
}

#[derive(Default)]
struct FakeRenderSystem {
    tex_cache: FakeTextureCache,
    passes: Slab<(Vec<MinimapVertex>, Vec<MinimapIndex>)>,
    passes_created: u32,
    passes_released: u32,
    draws: Vec<(MinimapPassHandle, MinimapTextures, MinimapUniforms)>,
    fail_next_pass: bool,
}

impl RenderSystem for FakeRenderSystem {
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) -> RenderStats { RenderStats::default() }

    fn texture_cache(&self) -> &dyn TextureCache { &self.tex_cache }
    fn texture_cache_mut(&mut self) -> &mut dyn TextureCache { &mut self.tex_cache }

    fn viewport_size(&self) -> Size { Size::new(1024, 768) }
    fn set_viewport_size(&mut self, _new_size: Size) {}

    fn new_minimap_pass(&mut self,
                        vertices: &[MinimapVertex],
                        indices: &[MinimapIndex]) -> Result<MinimapPassHandle, String> {
        if self.fail_next_pass {
            self.fail_next_pass = false;
            return Err("[FS]: syntax error".to_string());
        }
        self.passes_created += 1;
        let index = self.passes.insert((vertices.to_vec(), indices.to_vec()));
        Ok(MinimapPassHandle::Index(index as u32))
    }

    fn release_minimap_pass(&mut self, pass: &mut MinimapPassHandle) {
        if let MinimapPassHandle::Index(index) = *pass {
            if self.passes.try_remove(index as usize).is_some() {
                self.passes_released += 1;
            }
        }
        *pass = MinimapPassHandle::invalid();
    }

    fn draw_minimap_pass(&mut self,
                         pass: MinimapPassHandle,
                         textures: MinimapTextures,
                         uniforms: &MinimapUniforms) {
        self.draws.push((pass, textures, *uniforms));
    }
}

fn flying_view(position: Vec3, front: Vec3) -> SimulationView {
    SimulationView {
        plane_position: position,
        plane_front: front,
        is_crashed: false,
        terrain_size: Size::new(1000, 1000),
    }
}

// ----------------------------------------------
// Lifecycle
// ----------------------------------------------

#[test]
fn test_init_uploads_quad_and_trail() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    assert!(!minimap.is_initialized());

    minimap.init(&mut render_sys).unwrap();
    assert!(minimap.is_initialized());
    assert!(minimap.trail_texture().is_valid());

    // Quad geometry handed to the backend as-is.
    let (vertices, indices) = &render_sys.passes[0];
    assert_eq!(vertices.as_slice(), minimap.quad().vertices.as_slice());
    assert_eq!(indices.as_slice(), &[0, 1, 2, 0, 2, 3]);

    // Trail texture matches the CPU buffer and samples linearly with clamping.
    let TextureHandle::Index(index) = minimap.trail_texture() else {
        panic!("trail texture should be valid");
    };
    let texture = &render_sys.tex_cache.textures[index as usize];
    let trail_buffer = minimap.trail_buffer().unwrap();
    assert_eq!(texture.size, Size::new(256, 256));
    assert_eq!(texture.pixels.as_slice(), trail_buffer.as_bytes());
    assert_eq!(texture.settings.filter, TextureFilter::Linear);
    assert_eq!(texture.settings.wrap_mode, TextureWrapMode::ClampToEdge);
    assert!(trail_buffer.covered_pixel_count() > 0);

    // Icon baked at the buffer center.
    let (cx, cy) = TrailBuffer::center();
    assert!(trail_buffer.get(cx, cy).unwrap().a > 0);
    assert_eq!(trail_buffer.get(0, 0).unwrap().a, 0);
}

#[test]
fn test_init_is_idempotent() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.init(&mut render_sys).unwrap();
    let pass = minimap.pass_handle();
    let trail = minimap.trail_texture();

    minimap.init(&mut render_sys).unwrap();
    assert_eq!(minimap.pass_handle(), pass);
    assert_eq!(minimap.trail_texture(), trail);
    assert_eq!(render_sys.passes_created, 1);
    assert_eq!(render_sys.tex_cache.created_count, 1);
}

#[test]
fn test_cleanup_twice_releases_once() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.init(&mut render_sys).unwrap();

    minimap.cleanup(&mut render_sys);
    minimap.cleanup(&mut render_sys);

    assert!(!minimap.is_initialized());
    assert!(!minimap.trail_texture().is_valid());
    assert!(minimap.trail_buffer().is_none());
    assert_eq!(render_sys.passes_released, 1);
    assert_eq!(render_sys.tex_cache.released_count, 1);
    assert!(render_sys.passes.is_empty());
    assert!(render_sys.tex_cache.textures.is_empty());
}

#[test]
fn test_cleanup_before_init_is_harmless() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.cleanup(&mut render_sys);
    assert_eq!(render_sys.passes_released, 0);
    assert_eq!(render_sys.tex_cache.released_count, 0);
}

#[test]
fn test_init_after_cleanup() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.init(&mut render_sys).unwrap();
    minimap.cleanup(&mut render_sys);
    minimap.init(&mut render_sys).unwrap();

    assert!(minimap.is_initialized());
    assert!(minimap.trail_buffer().is_some());
    assert_eq!(render_sys.passes_created, 2);
    assert_eq!(render_sys.passes.len(), 1);
}

#[test]
fn test_failed_init_keeps_nothing_and_can_retry() {
    let mut render_sys = FakeRenderSystem { fail_next_pass: true, ..Default::default() };
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    let result = minimap.init(&mut render_sys);
    assert!(result.is_err());
    assert!(!minimap.is_initialized());
    assert!(!minimap.trail_texture().is_valid());
    assert!(minimap.trail_buffer().is_none());
    assert_eq!(render_sys.tex_cache.created_count, 0);

    minimap.init(&mut render_sys).unwrap();
    assert!(minimap.is_initialized());
}

// ----------------------------------------------
// Frame update
// ----------------------------------------------

#[test]
fn test_update_centered_plane() {
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.update(&flying_view(Vec3::new(0.0, 120.0, 0.0), Vec3::new(0.0, 0.0, -1.0)));

    let frame = minimap.frame_state();
    assert_eq!(frame.map_offset, Vec2::zero());
    assert_eq!(frame.heading, 0.0);
}

#[test]
fn test_update_heading_convention() {
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.update(&flying_view(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)));
    assert!(approx_equal(minimap.frame_state().heading, -FRAC_PI_2, 1e-6));

    minimap.update(&flying_view(Vec3::zero(), Vec3::new(-1.0, 0.0, 0.0)));
    assert!(approx_equal(minimap.frame_state().heading, FRAC_PI_2, 1e-6));

    // The vertical component of the front vector is ignored.
    minimap.update(&flying_view(Vec3::zero(), Vec3::new(0.0, -0.9, -0.1)));
    assert!(approx_equal(minimap.frame_state().heading, 0.0, 1e-6));
}

#[test]
fn test_update_offset_is_not_clamped() {
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.update(&flying_view(Vec3::new(250.0, 0.0, -500.0), Vec3::new(0.0, 0.0, -1.0)));
    let offset = minimap.frame_state().map_offset;
    assert!(approx_equal(offset.x, 0.25, 1e-6));
    assert!(approx_equal(offset.y, -0.5, 1e-6));

    // Past the terrain edge.
    minimap.update(&flying_view(Vec3::new(1500.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)));
    let offset = minimap.frame_state().map_offset;
    assert!(approx_equal(offset.x, 1.5, 1e-6));
    assert!(approx_equal(offset.y, 0.0, 1e-6));
}

#[test]
fn test_crashed_plane_freezes_frame_state() {
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.update(&flying_view(Vec3::new(100.0, 0.0, 100.0), Vec3::new(1.0, 0.0, 0.0)));
    let frozen = minimap.frame_state();

    let mut crashed = flying_view(Vec3::new(-300.0, 0.0, 40.0), Vec3::new(0.0, 0.0, 1.0));
    crashed.is_crashed = true;

    for _ in 0..3 {
        minimap.update(&crashed);
        assert_eq!(minimap.frame_state(), frozen);
    }

    crashed.is_crashed = false;
    minimap.update(&crashed);
    assert_ne!(minimap.frame_state(), frozen);
}

#[test]
fn test_reset_for_restart_keeps_state() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.init(&mut render_sys).unwrap();
    minimap.update(&flying_view(Vec3::new(100.0, 0.0, 100.0), Vec3::new(1.0, 0.0, 0.0)));

    let frame = minimap.frame_state();
    let pass = minimap.pass_handle();

    minimap.reset_for_restart();
    assert_eq!(minimap.frame_state(), frame);
    assert_eq!(minimap.pass_handle(), pass);
    assert!(minimap.is_initialized());
}

// ----------------------------------------------
// Draw
// ----------------------------------------------

#[test]
fn test_draw_before_init_is_a_no_op() {
    let mut render_sys = FakeRenderSystem::default();
    let minimap = MinimapOverlay::new(MinimapConfigs::default());

    minimap.draw(&mut render_sys, NativeTextureHandle { bits: 7 });
    assert!(render_sys.draws.is_empty());
}

#[test]
fn test_draw_passes_frame_state_and_textures() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.init(&mut render_sys).unwrap();
    minimap.update(&flying_view(Vec3::new(250.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));

    let heightmap = NativeTextureHandle { bits: 7 };
    minimap.draw(&mut render_sys, heightmap);
    minimap.draw(&mut render_sys, heightmap);
    assert_eq!(render_sys.draws.len(), 2);

    let (pass, textures, uniforms) = render_sys.draws[0];
    assert_eq!(pass, minimap.pass_handle());
    assert_eq!(textures.heightmap, heightmap);
    assert_eq!(textures.trail, minimap.trail_texture());
    assert!(approx_equal(uniforms.map_offset.x, 0.25, 1e-6));
    assert!(approx_equal(uniforms.rotation_angle, -FRAC_PI_2, 1e-6));
    assert_eq!(uniforms.overlay_alpha, 0.8);

    // Drawing does not touch CPU-side state.
    assert_eq!(render_sys.draws[1].2, uniforms);
}

#[test]
fn test_draw_after_cleanup_is_a_no_op() {
    let mut render_sys = FakeRenderSystem::default();
    let mut minimap = MinimapOverlay::new(MinimapConfigs::default());
    minimap.init(&mut render_sys).unwrap();
    minimap.cleanup(&mut render_sys);

    minimap.draw(&mut render_sys, NativeTextureHandle { bits: 7 });
    assert!(render_sys.draws.is_empty());
}

// ----------------------------------------------
// Quad & configs
// ----------------------------------------------

#[test]
fn test_default_quad_layout() {
    let quad = MinimapQuad::new(&MinimapConfigs::default());

    let expected = [
        (0.45, 0.95, 0.0, 0.0),
        (0.45, 0.35, 0.0, 1.0),
        (0.95, 0.35, 1.0, 1.0),
        (0.95, 0.95, 1.0, 0.0),
    ];

    for (vertex, (x, y, u, v)) in quad.vertices.iter().zip(expected) {
        assert!(approx_equal(vertex.position.x, x, 1e-6));
        assert!(approx_equal(vertex.position.y, y, 1e-6));
        assert_eq!(vertex.tex_coords, Vec2::new(u, v));
    }

    assert_eq!(quad.indices, [0, 1, 2, 0, 2, 3]);
    assert_eq!(quad.triangle_count(), 2);
}

#[test]
fn test_quad_follows_configs() {
    let configs = MinimapConfigs {
        size_scale: 1.0,
        anchor: Vec2::new(0.0, 0.0),
        base_size: Vec2::new(0.5, 0.25),
        ..MinimapConfigs::default()
    };
    let quad = MinimapQuad::new(&configs);
    assert_eq!(quad.vertices[0].position, Vec2::new(-0.5, 0.0));
    assert_eq!(quad.vertices[2].position, Vec2::new(0.0, -0.25));
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let configs: MinimapConfigs = serde_json::from_str(r#"{ "transparency": 0.5, "icon_size": 20.0 }"#).unwrap();
    let defaults = MinimapConfigs::default();

    assert_eq!(configs.transparency, 0.5);
    assert_eq!(configs.icon_size, 20.0);
    assert_eq!(configs.anchor, defaults.anchor);
    assert_eq!(configs.wing_color, defaults.wing_color);
}

#[test]
fn test_config_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("plane_minimap_configs_{}", std::process::id()));
    let path = dir.join("minimap.json");

    let configs = MinimapConfigs { transparency: 0.65, ..MinimapConfigs::default() };
    assert!(configs.save_file_at(&path));

    let loaded: MinimapConfigs = MinimapConfigs::load_file_at(&path);
    assert_eq!(loaded, configs);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_config_file_returns_defaults() {
    let path = std::env::temp_dir().join("plane_minimap_does_not_exist/minimap.json");
    let loaded: MinimapConfigs = MinimapConfigs::load_file_at(&path);
    assert_eq!(loaded, MinimapConfigs::default());
}
