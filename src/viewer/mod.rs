use serde::{Deserialize, Serialize};

use plane_minimap::{
    config::Configs,
    log,
    minimap::state::SimulationView,
    utils::{Color, Size, Vec3},
};

pub mod heightmap;

// ----------------------------------------------
// ViewerConfigs
// ----------------------------------------------

pub const VIEWER_CONFIGS_FILE_NAME: &str = "viewer";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfigs {
    pub window_title: String,
    pub window_size: Size,
    pub background_color: Color,
    pub log_level: log::Level,
    pub log_source_location: bool,
    pub log_tty_colors: bool,

    // World units covered by the heightmap, centered on the origin.
    pub terrain_size: Size,

    // Procedural heightmap, used when no image path is given.
    pub heightmap_size: Size,
    pub heightmap_octaves: u32,
    pub heightmap_seed: u64,

    // Demo flight path: figure eight around the terrain center.
    pub flight_radius: f32,
    pub flight_altitude: f32,
    pub flight_speed: f32, // Radians per second along the path.
}

impl Default for ViewerConfigs {
    fn default() -> Self {
        Self {
            window_title: "Minimap Viewer".into(),
            window_size: Size::new(1024, 768),
            background_color: Color::rgb(0.2, 0.3, 0.45),
            log_level: log::Level::Info,
            log_source_location: false,
            log_tty_colors: true,
            terrain_size: Size::new(2048, 2048),
            heightmap_size: Size::new(512, 512),
            heightmap_octaves: 5,
            heightmap_seed: 0xC0FFEE,
            flight_radius: 700.0,
            flight_altitude: 120.0,
            flight_speed: 0.15,
        }
    }
}

impl Configs for ViewerConfigs {
    fn post_load(&mut self) {
        if !self.window_size.is_valid() {
            self.window_size = Self::default().window_size;
        }
        if !self.heightmap_size.is_valid() {
            self.heightmap_size = Self::default().heightmap_size;
        }
        self.heightmap_octaves = self.heightmap_octaves.clamp(1, 8);
        self.flight_radius = self.flight_radius.max(0.0);
    }
}

// ----------------------------------------------
// DemoFlight
// ----------------------------------------------

// Stand-in for the flight simulation: the plane follows a lemniscate
// over the terrain and can be crashed/restarted from the keyboard.
pub struct DemoFlight {
    radius: f32,
    altitude: f32,
    speed: f32,
    terrain_size: Size,
    path_time: f32,
    is_crashed: bool,
}

impl DemoFlight {
    pub fn new(configs: &ViewerConfigs) -> Self {
        Self {
            radius: configs.flight_radius,
            altitude: configs.flight_altitude,
            speed: configs.flight_speed,
            terrain_size: configs.terrain_size,
            path_time: 0.0,
            is_crashed: false,
        }
    }

    pub fn update(&mut self, delta_time_secs: f32) {
        if !self.is_crashed {
            self.path_time += delta_time_secs * self.speed;
        }
    }

    #[inline]
    pub fn is_crashed(&self) -> bool {
        self.is_crashed
    }

    pub fn toggle_crash(&mut self) {
        self.is_crashed = !self.is_crashed;
        log::info!(log::channel!("viewer"), "Plane {}.", if self.is_crashed { "crashed" } else { "recovered" });
    }

    pub fn restart(&mut self) {
        self.path_time = 0.0;
        self.is_crashed = false;
        log::info!(log::channel!("viewer"), "Flight restarted.");
    }

    pub fn position(&self) -> Vec3 {
        let t = self.path_time;
        Vec3::new(self.radius * t.sin(), self.altitude, self.radius * t.sin() * t.cos())
    }

    // Normalized path tangent.
    pub fn front(&self) -> Vec3 {
        let t = self.path_time;
        let dx = t.cos();
        let dz = (2.0 * t).cos();
        let length = (dx * dx + dz * dz).sqrt();
        if length <= f32::EPSILON {
            return Vec3::new(0.0, 0.0, -1.0);
        }
        Vec3::new(dx / length, 0.0, dz / length)
    }

    pub fn simulation_view(&self) -> SimulationView {
        SimulationView {
            plane_position: self.position(),
            plane_front: self.front(),
            is_crashed: self.is_crashed,
            terrain_size: self.terrain_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plane_minimap::utils::approx_equal;

    #[test]
    fn test_flight_starts_at_terrain_center_heading_east() {
        let flight = DemoFlight::new(&ViewerConfigs::default());
        let view = flight.simulation_view();
        assert_eq!(view.plane_position, Vec3::new(0.0, 120.0, 0.0));
        assert!(approx_equal(view.plane_front.x, std::f32::consts::FRAC_1_SQRT_2, 1e-6));
        assert!(approx_equal(view.plane_front.z, std::f32::consts::FRAC_1_SQRT_2, 1e-6));
        assert!(!view.is_crashed);
    }

    #[test]
    fn test_crashed_flight_does_not_advance() {
        let mut flight = DemoFlight::new(&ViewerConfigs::default());
        flight.update(1.0);
        let before = flight.position();

        flight.toggle_crash();
        flight.update(5.0);
        assert_eq!(flight.position(), before);
        assert!(flight.simulation_view().is_crashed);

        flight.restart();
        assert_eq!(flight.position(), Vec3::new(0.0, 120.0, 0.0));
        assert!(!flight.is_crashed());
    }

    #[test]
    fn test_post_load_fixes_invalid_values() {
        let mut configs = ViewerConfigs {
            window_size: Size::zero(),
            heightmap_octaves: 0,
            flight_radius: -10.0,
            ..ViewerConfigs::default()
        };
        configs.post_load();
        assert_eq!(configs.window_size, Size::new(1024, 768));
        assert_eq!(configs.heightmap_octaves, 1);
        assert_eq!(configs.flight_radius, 0.0);
    }
}
