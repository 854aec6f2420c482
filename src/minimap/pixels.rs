use std::path::Path;

use crate::utils::{Color, Size};

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Width & height of the trail texture in pixels.
pub const TRAIL_TEXTURE_SIZE: i32 = 256;

const TRAIL_PIXEL_COUNT: usize = (TRAIL_TEXTURE_SIZE * TRAIL_TEXTURE_SIZE) as usize;

// Compositing results with less coverage than this are dropped.
const MIN_COMPOSITE_ALPHA: f32 = 1e-5;

// ----------------------------------------------
// Rgba8
// ----------------------------------------------

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    // Color channels are clamped to [0,1] and rounded to the nearest byte.
    #[inline]
    pub fn from_color(color: Color, alpha: u8) -> Self {
        Self {
            r: unit_to_byte(color.r),
            g: unit_to_byte(color.g),
            b: unit_to_byte(color.b),
            a: alpha,
        }
    }

    #[inline]
    pub fn to_color(self) -> Color {
        Color::new(
            byte_to_unit(self.r),
            byte_to_unit(self.g),
            byte_to_unit(self.b),
            byte_to_unit(self.a),
        )
    }
}

#[inline]
pub fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
pub fn byte_to_unit(value: u8) -> f32 {
    (value as f32) / 255.0
}

// ----------------------------------------------
// TrailBuffer
// ----------------------------------------------

// CPU copy of the trail texture. Row 0 is the first row uploaded to the GPU.
pub struct TrailBuffer {
    pixels: Box<[Rgba8]>,
}

impl TrailBuffer {
    // All pixels start fully transparent.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgba8::TRANSPARENT; TRAIL_PIXEL_COUNT].into_boxed_slice(),
        }
    }

    #[inline]
    pub const fn size() -> Size {
        Size::new(TRAIL_TEXTURE_SIZE, TRAIL_TEXTURE_SIZE)
    }

    #[inline]
    pub const fn center() -> (i32, i32) {
        (TRAIL_TEXTURE_SIZE / 2, TRAIL_TEXTURE_SIZE / 2)
    }

    #[inline]
    pub fn is_within_bounds(x: i32, y: i32) -> bool {
        if (x < 0 || x >= TRAIL_TEXTURE_SIZE)
            || (y < 0 || y >= TRAIL_TEXTURE_SIZE)
        {
            return false;
        }
        true
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgba8> {
        if !Self::is_within_bounds(x, y) {
            return None;
        }
        Some(self.pixels[Self::pixel_index(x, y)])
    }

    // Source-over compositing of `color` with coverage `alpha` onto the
    // pixel at (x,y), normalized by the resulting alpha. Writes outside
    // the buffer and zero coverage are ignored.
    pub fn set_pixel_alpha(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if alpha == 0 || !Self::is_within_bounds(x, y) {
            return;
        }

        let index = Self::pixel_index(x, y);
        let background = self.pixels[index].to_color();

        let src_alpha = byte_to_unit(alpha);
        let dst_alpha = background.a * (1.0 - src_alpha);
        let final_alpha = src_alpha + dst_alpha;
        if final_alpha < MIN_COMPOSITE_ALPHA {
            return;
        }

        let blend = |src: f32, dst: f32| ((src * src_alpha) + (dst * dst_alpha)) / final_alpha;

        self.pixels[index] = Rgba8 {
            r: unit_to_byte(blend(color.r, background.r)),
            g: unit_to_byte(blend(color.g, background.g)),
            b: unit_to_byte(blend(color.b, background.b)),
            a: unit_to_byte(final_alpha),
        };
    }

    // Number of pixels with any coverage.
    pub fn covered_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.a != 0).count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        let len_in_bytes = self.pixels.len() * std::mem::size_of::<Rgba8>();
        let bytes_ptr = self.pixels.as_ptr() as *const u8;
        // SAFETY: Rgba8 is repr(C) with four u8 fields, no padding.
        unsafe { std::slice::from_raw_parts(bytes_ptr, len_in_bytes) }
    }

    // Writes the buffer as an RGBA PNG for inspection.
    pub fn save_png(&self, file_path: impl AsRef<Path>) -> Result<(), String> {
        let file_path = file_path.as_ref();
        image::save_buffer(file_path,
                           self.as_bytes(),
                           TRAIL_TEXTURE_SIZE as u32,
                           TRAIL_TEXTURE_SIZE as u32,
                           image::ColorType::Rgba8)
            .map_err(|err| format!("Failed to save trail image {file_path:?}: {err}"))
    }

    #[inline]
    fn pixel_index(x: i32, y: i32) -> usize {
        debug_assert!(Self::is_within_bounds(x, y));
        (x + (y * TRAIL_TEXTURE_SIZE)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let buffer = TrailBuffer::new();
        assert_eq!(buffer.as_bytes().len(), 256 * 256 * 4);
        assert!(buffer.as_bytes().iter().all(|&byte| byte == 0));
        assert_eq!(buffer.covered_pixel_count(), 0);
    }

    #[test]
    fn test_opaque_over_opaque_yields_source() {
        let mut buffer = TrailBuffer::new();
        let color_a = Color::rgb(0.9, 0.1, 0.3);
        let color_b = Color::rgb(0.2, 0.6, 1.0);

        buffer.set_pixel_alpha(10, 20, color_a, 255);
        buffer.set_pixel_alpha(10, 20, color_b, 255);

        assert_eq!(buffer.get(10, 20), Some(Rgba8::from_color(color_b, 255)));
    }

    #[test]
    fn test_zero_alpha_is_a_no_op() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(5, 5, Color::rgb(0.8, 0.8, 0.8), 128);
        let before = buffer.get(5, 5);

        buffer.set_pixel_alpha(5, 5, Color::rgb(0.0, 1.0, 0.0), 0);
        assert_eq!(buffer.get(5, 5), before);

        // Also on a fully transparent pixel.
        buffer.set_pixel_alpha(6, 5, Color::rgb(0.0, 1.0, 0.0), 0);
        assert_eq!(buffer.get(6, 5), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_partial_alpha_over_transparent_keeps_color() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(0, 0, Color::rgb(1.0, 0.4, 0.0), 64);

        let pixel = buffer.get(0, 0).unwrap();
        assert_eq!(pixel.a, 64);
        // Normalized by the final alpha, so the color is not darkened.
        assert_eq!(pixel.r, 255);
        assert_eq!(pixel.g, 102);
        assert_eq!(pixel.b, 0);
    }

    #[test]
    fn test_partial_alpha_accumulates() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(1, 1, Color::white(), 128);
        buffer.set_pixel_alpha(1, 1, Color::white(), 128);

        let pixel = buffer.get(1, 1).unwrap();
        assert!(pixel.a > 128);
        assert_eq!((pixel.r, pixel.g, pixel.b), (255, 255, 255));
    }

    #[test]
    fn test_out_of_bounds_writes_are_dropped() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(-1, 0, Color::white(), 255);
        buffer.set_pixel_alpha(0, -1, Color::white(), 255);
        buffer.set_pixel_alpha(TRAIL_TEXTURE_SIZE, 0, Color::white(), 255);
        buffer.set_pixel_alpha(0, TRAIL_TEXTURE_SIZE, Color::white(), 255);

        assert_eq!(buffer.covered_pixel_count(), 0);
        assert_eq!(buffer.get(-1, 0), None);
        assert_eq!(buffer.get(0, TRAIL_TEXTURE_SIZE), None);
    }

    #[test]
    fn test_row_major_layout() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(3, 1, Color::white(), 255);

        let offset = ((1 * TRAIL_TEXTURE_SIZE + 3) * 4) as usize;
        assert_eq!(&buffer.as_bytes()[offset..offset + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_save_png_writes_rgba_image() {
        let mut buffer = TrailBuffer::new();
        buffer.set_pixel_alpha(7, 9, Color::rgb(1.0, 0.0, 0.0), 200);

        let file_path = std::env::temp_dir().join("plane_minimap_trail_test.png");
        assert!(buffer.save_png(&file_path).is_ok());

        let image = image::open(&file_path).unwrap().to_rgba8();
        let _ = std::fs::remove_file(&file_path);

        assert_eq!(image.dimensions(), (256, 256));
        assert_eq!(image.get_pixel(7, 9).0, [255, 0, 0, 200]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
