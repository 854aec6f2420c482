use plane_minimap::{
    log,
    app::{Application, ApplicationBuilder, ApplicationEvent, input::{InputAction, InputKey}},
    config::Configs,
    minimap::{config::{MinimapConfigs, MINIMAP_CONFIGS_FILE_NAME}, MinimapOverlay},
    render::{
        RenderStats,
        RenderSystem,
        RenderSystemBuilder,
        TextureCache,
        TextureFilter,
        TextureHandle,
        TextureLoaderFlags,
        TextureSettings,
        TextureWrapMode,
    },
};

mod viewer;
use viewer::{heightmap::Heightmap, DemoFlight, ViewerConfigs, VIEWER_CONFIGS_FILE_NAME};

const TRAIL_SNAPSHOT_PATH: &str = "minimap_trail.png";

// ----------------------------------------------
// main()
// ----------------------------------------------

fn main() {
    let viewer_configs = ViewerConfigs::load_file::<ViewerConfigs>(VIEWER_CONFIGS_FILE_NAME);
    log::set_level(viewer_configs.log_level);
    log::enable_source_location(viewer_configs.log_source_location);
    log::enable_tty_colors(viewer_configs.log_tty_colors);

    let minimap_configs = MinimapConfigs::load_file::<MinimapConfigs>(MINIMAP_CONFIGS_FILE_NAME);
    let heightmap_path = std::env::args().nth(1);

    if let Err(err) = run(&viewer_configs, minimap_configs, heightmap_path.as_deref()) {
        log::error!(log::channel!("viewer"), "Minimap viewer failed: {err}");
        std::process::exit(1);
    }
}

fn run(viewer_configs: &ViewerConfigs,
       minimap_configs: MinimapConfigs,
       heightmap_path: Option<&str>) -> Result<(), String> {
    let mut app = ApplicationBuilder::new()
        .window_title(&viewer_configs.window_title)
        .window_size(viewer_configs.window_size)
        .build()?;

    log::info!(log::channel!("viewer"),
               "Window: {}, framebuffer: {}.",
               app.window_size(), app.framebuffer_size());

    let mut render_sys = RenderSystemBuilder::new()
        .viewport_size(app.framebuffer_size())
        .clear_color(viewer_configs.background_color)
        .build();

    let mut heightmap_texture = load_heightmap(render_sys.texture_cache_mut(), viewer_configs, heightmap_path)?;

    let mut minimap = MinimapOverlay::new(minimap_configs);
    if let Err(err) = minimap.init(&mut render_sys) {
        render_sys.texture_cache_mut().release_texture(&mut heightmap_texture);
        return Err(err);
    }

    let mut flight = DemoFlight::new(viewer_configs);
    let mut last_frame_time = app.time();
    let mut render_stats = RenderStats::default();

    log::info!(log::channel!("viewer"), "Keys: [C] crash/recover, [R] restart, [P] save trail texture, [Esc] quit.");

    while !app.should_quit() {
        for event in app.poll_events() {
            match event {
                ApplicationEvent::Quit => {
                    app.request_quit();
                }
                ApplicationEvent::WindowResize(_) => {
                    render_sys.set_viewport_size(app.framebuffer_size());
                }
                ApplicationEvent::KeyInput(key, InputAction::Press, _) => {
                    match key {
                        InputKey::Escape => app.request_quit(),
                        InputKey::C => flight.toggle_crash(),
                        InputKey::R => {
                            flight.restart();
                            minimap.reset_for_restart();
                        }
                        InputKey::P => save_trail_snapshot(&minimap),
                        _ => {}
                    }
                }
                ApplicationEvent::KeyInput(..) => {}
            }
        }

        let current_time = app.time();
        let delta_time_secs = (current_time - last_frame_time) as f32;
        last_frame_time = current_time;

        flight.update(delta_time_secs);
        minimap.update(&flight.simulation_view());

        render_sys.begin_frame();
        let heightmap = render_sys.texture_cache().to_native_handle(heightmap_texture);
        minimap.draw(&mut render_sys, heightmap);
        render_stats = render_sys.end_frame();

        app.present();
    }

    minimap.cleanup(&mut render_sys);
    render_sys.texture_cache_mut().release_texture(&mut heightmap_texture);

    log::info!(log::channel!("viewer"),
               "Peak per frame: {} draw calls, {} triangles, {} texture changes.",
               render_stats.peak_draw_calls,
               render_stats.peak_triangles_drawn,
               render_stats.peak_texture_changes);

    Ok(())
}

// Loads the image given on the command line or generates a noise heightmap.
fn load_heightmap(tex_cache: &mut dyn TextureCache,
                  viewer_configs: &ViewerConfigs,
                  heightmap_path: Option<&str>) -> Result<TextureHandle, String> {
    let settings = TextureSettings {
        filter: TextureFilter::Linear,
        wrap_mode: TextureWrapMode::Repeat,
        gen_mipmaps: true,
    };

    if let Some(path) = heightmap_path {
        return tex_cache.load_texture(path, TextureLoaderFlags::empty(), settings);
    }

    let heightmap = Heightmap::generate(viewer_configs.heightmap_size,
                                        viewer_configs.heightmap_octaves,
                                        viewer_configs.heightmap_seed);

    log::info!(log::channel!("viewer"),
               "Generated {} heightmap (seed: {:#x}).",
               heightmap.size, viewer_configs.heightmap_seed);

    Ok(tex_cache.new_texture_with_pixels("heightmap",
                                         heightmap.size,
                                         &heightmap.to_rgba_pixels(),
                                         settings))
}

fn save_trail_snapshot(minimap: &MinimapOverlay) {
    let Some(trail_buffer) = minimap.trail_buffer() else {
        log::warn!(log::channel!("viewer"), "Minimap not initialized; no trail texture to save.");
        return;
    };

    match trail_buffer.save_png(TRAIL_SNAPSHOT_PATH) {
        Ok(()) => log::info!(log::channel!("viewer"), "Saved trail texture to '{TRAIL_SNAPSHOT_PATH}'."),
        Err(err) => log::error!(log::channel!("viewer"), "Failed to save trail texture: {err}"),
    }
}
