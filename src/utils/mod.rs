use std::ops::{Add, Sub, Mul};
use serde::{Deserialize, Serialize};

// ----------------------------------------------
// Macros
// ----------------------------------------------

#[macro_export]
macro_rules! name_of {
    ($t:ty, $field:ident) => {{
        // Access the field to force a compile-time check for the field existence.
        let _ = |x: &$t| { let _ = &x.$field; };
        stringify!($field)
    }};
}

// ----------------------------------------------
// Vec2
// ----------------------------------------------

// 2D vector or point (f32).
// For interfacing with shaders and the rendering system.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    #[inline]
    #[must_use]
    pub fn dot(&self, other: Self) -> f32 {
        (self.x * other.x) + (self.y * other.y)
    }

    // 2D cross product (z component of the 3D cross).
    #[inline]
    #[must_use]
    pub fn perp_dot(&self, other: Self) -> f32 {
        (self.x * other.y) - (self.y * other.x)
    }

    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, other: Self) -> f32 {
        (*self - other).length()
    }

    // Counter-clockwise rotation around the origin.
    #[inline]
    #[must_use]
    pub fn rotate(&self, angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self {
            x: (self.x * c) - (self.y * s),
            y: (self.x * s) + (self.y * c),
        }
    }

    #[inline]
    #[must_use]
    pub fn min(&self, other: Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
        }
    }

    #[inline]
    #[must_use]
    pub fn max(&self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }
}

// Vec2 + Vec2
impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

// Vec2 - Vec2
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// Vec2 * f32
impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, scalar: f32) -> Vec2 {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }
}

// f32 * Vec2
impl Mul<Vec2> for f32 {
    type Output = Vec2;
    fn mul(self, vec: Vec2) -> Vec2 {
        Vec2 { x: vec.x * self, y: vec.y * self }
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

// ----------------------------------------------
// Vec3
// ----------------------------------------------

// World space position or direction. The minimap only looks at X/Z.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }
}

// ----------------------------------------------
// Color
// ----------------------------------------------

// Normalized RGBA color (f32, [0,1] range).
// For interfacing with shaders and the rendering system.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline] pub const fn white() -> Self { Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 } }
    #[inline] pub const fn black() -> Self { Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 } }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Color::white()
    }
}

// Color + Color
impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color { r: (self.r + rhs.r).min(1.0),
                g: (self.g + rhs.g).min(1.0),
                b: (self.b + rhs.b).min(1.0),
                a: (self.a + rhs.a).min(1.0) }
    }
}

// Color * f32
impl Mul<f32> for Color {
    type Output = Color;
    fn mul(self, rhs: f32) -> Color {
        Color { r: (self.r * rhs).min(1.0),
                g: (self.g * rhs).min(1.0),
                b: (self.b * rhs).min(1.0),
                a: (self.a * rhs).min(1.0) }
    }
}

// f32 * Color
impl Mul<Color> for f32 {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        Color { r: (self * rhs.r).min(1.0),
                g: (self * rhs.g).min(1.0),
                b: (self * rhs.b).min(1.0),
                a: (self * rhs.a).min(1.0) }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{},{},{}]", self.r, self.g, self.b, self.a)
    }
}

// ----------------------------------------------
// Size
// ----------------------------------------------

// Integer width & height pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub const fn area(&self) -> i32 {
        self.width * self.height
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ----------------------------------------------
// Math helpers
// ----------------------------------------------

// Linear interpolation.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f32) -> T
    where T: Mul<f32, Output = T> + Add<Output = T> + Copy,
          f32: Mul<T, Output = T> /* for (1.0 - t) * a */
{
    (1.0 - t) * a + t * b
}

// Hermite interpolation between two edges, same as GLSL smoothstep().
// Returns 0 when x <= edge0 and 1 when x >= edge1.
// Collapsed edges (edge0 >= edge1) act as a step at edge0.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -5.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 7.0), 1.0);
        assert!(approx_equal(smoothstep(0.0, 1.0, 0.5), 0.5, 1e-6));
        assert!(approx_equal(smoothstep(0.5, 1.0, 0.75), 0.5, 1e-6));
    }

    #[test]
    fn test_smoothstep_collapsed_edges() {
        assert_eq!(smoothstep(0.0, 0.0, -0.1), 0.0);
        assert_eq!(smoothstep(0.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.0, 0.0, 2.0), 1.0);
        assert!(!smoothstep(1.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_lerp_colors() {
        let a = Color::rgb(0.0, 0.2, 1.0);
        let b = Color::rgb(1.0, 0.4, 0.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);

        let mid = lerp(a, b, 0.5);
        assert!(approx_equal(mid.r, 0.5, 1e-6));
        assert!(approx_equal(mid.g, 0.3, 1e-6));
        assert!(approx_equal(mid.b, 0.5, 1e-6));
    }

    #[test]
    fn test_vec2_rotate() {
        let v = Vec2::new(1.0, 0.0).rotate(std::f32::consts::FRAC_PI_2);
        assert!(approx_equal(v.x, 0.0, 1e-6));
        assert!(approx_equal(v.y, 1.0, 1e-6));
    }
}
