use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use plane_minimap::{
    minimap::pixels::Rgba8,
    utils::{lerp, smoothstep, Color, Size},
};

// ----------------------------------------------
// ValueNoise
// ----------------------------------------------

// Tileable 2D value noise over a square lattice of random values.
pub struct ValueNoise {
    lattice: Vec<f32>,
    period: usize,
}

impl ValueNoise {
    pub fn new(period: usize, rng: &mut Pcg64) -> Self {
        debug_assert!(period > 0);
        let lattice = (0..period * period).map(|_| rng.random::<f32>()).collect();
        Self { lattice, period }
    }

    #[inline]
    fn lattice_value(&self, x: i64, y: i64) -> f32 {
        let period = self.period as i64;
        let wx = x.rem_euclid(period) as usize;
        let wy = y.rem_euclid(period) as usize;
        self.lattice[wx + (wy * self.period)]
    }

    // Sample at lattice coordinates. Wraps every `period` units.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (x0, y0) = (x.floor(), y.floor());
        let (tx, ty) = (smoothstep(0.0, 1.0, x - x0), smoothstep(0.0, 1.0, y - y0));
        let (ix, iy) = (x0 as i64, y0 as i64);

        let top = lerp(self.lattice_value(ix, iy), self.lattice_value(ix + 1, iy), tx);
        let bottom = lerp(self.lattice_value(ix, iy + 1), self.lattice_value(ix + 1, iy + 1), tx);
        lerp(top, bottom, ty)
    }
}

// ----------------------------------------------
// Heightmap
// ----------------------------------------------

pub struct Heightmap {
    pub size: Size,
    pub heights: Vec<f32>, // [0,1], row-major.
}

impl Heightmap {
    // Fractal sum of value noise octaves. Tiles seamlessly since the
    // minimap samples it with wrapping texture coordinates.
    pub fn generate(size: Size, octaves: u32, seed: u64) -> Self {
        debug_assert!(size.is_valid());

        let mut rng = Pcg64::seed_from_u64(seed);
        let layers: Vec<(ValueNoise, f32, f32)> = (0..octaves.max(1))
            .map(|octave| {
                let period = 4usize << octave;
                let amplitude = 0.5f32.powi(octave as i32);
                (ValueNoise::new(period, &mut rng), period as f32, amplitude)
            })
            .collect();

        let total_amplitude: f32 = layers.iter().map(|(_, _, amplitude)| amplitude).sum();

        let mut heights = Vec::with_capacity(size.area() as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                let u = (x as f32) / (size.width as f32);
                let v = (y as f32) / (size.height as f32);

                let height: f32 = layers.iter()
                    .map(|(noise, period, amplitude)| noise.sample(u * period, v * period) * amplitude)
                    .sum();

                heights.push((height / total_amplitude).clamp(0.0, 1.0));
            }
        }

        Self { size, heights }
    }

    // Terrain-tinted RGBA8 pixels for the minimap background.
    pub fn to_rgba_pixels(&self) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(self.heights.len() * 4);
        for &height in &self.heights {
            let texel = Rgba8::from_color(terrain_color(height), 255);
            pixels.extend_from_slice(&[texel.r, texel.g, texel.b, texel.a]);
        }
        pixels
    }
}

// Water, beach, grass, rock then snow with soft transitions.
pub fn terrain_color(height: f32) -> Color {
    const BANDS: [(f32, Color); 5] = [
        (0.35, Color::rgb(0.10, 0.25, 0.55)),
        (0.40, Color::rgb(0.80, 0.75, 0.50)),
        (0.55, Color::rgb(0.20, 0.55, 0.20)),
        (0.70, Color::rgb(0.45, 0.40, 0.35)),
        (0.80, Color::rgb(0.95, 0.95, 0.95)),
    ];

    let height = height.clamp(0.0, 1.0);
    let mut color = BANDS[0].1;
    for window in BANDS.windows(2) {
        let (from_height, from_color) = window[0];
        let (to_height, to_color) = window[1];
        if height > from_height {
            color = lerp(from_color, to_color, smoothstep(from_height, to_height, height));
        }
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_is_deterministic_and_normalized() {
        let a = Heightmap::generate(Size::new(32, 32), 3, 1234);
        let b = Heightmap::generate(Size::new(32, 32), 3, 1234);
        assert_eq!(a.heights, b.heights);
        assert_eq!(a.heights.len(), 32 * 32);
        assert!(a.heights.iter().all(|h| (0.0..=1.0).contains(h)));

        let c = Heightmap::generate(Size::new(32, 32), 3, 4321);
        assert_ne!(a.heights, c.heights);
    }

    #[test]
    fn test_value_noise_wraps() {
        let mut rng = Pcg64::seed_from_u64(7);
        let noise = ValueNoise::new(4, &mut rng);
        assert_eq!(noise.sample(0.0, 0.0), noise.sample(4.0, 0.0));
        assert_eq!(noise.sample(1.0, 2.0), noise.sample(1.0, 6.0));
        assert_eq!(noise.sample(-3.0, 0.0), noise.sample(1.0, 0.0));
    }

    #[test]
    fn test_rgba_pixels_are_opaque() {
        let heightmap = Heightmap::generate(Size::new(8, 8), 2, 99);
        let pixels = heightmap.to_rgba_pixels();
        assert_eq!(pixels.len(), 8 * 8 * 4);
        assert!(pixels.chunks_exact(4).all(|pixel| pixel[3] == 255));
    }

    #[test]
    fn test_terrain_color_bands() {
        assert_eq!(terrain_color(0.0), Color::rgb(0.10, 0.25, 0.55));
        assert_eq!(terrain_color(1.0), Color::rgb(0.95, 0.95, 0.95));
    }
}
