use arrayvec::ArrayVec;

use crate::utils::{lerp, smoothstep, Color, Vec2};

use super::{
    config::MinimapConfigs,
    geometry::{Circle, Segment, Triangle},
    pixels::{unit_to_byte, TrailBuffer},
};

// ----------------------------------------------
// IconPaint
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IconPaint {
    Solid(Color),

    // Blends from `bottom` at y = y_bottom to `top` at y = y_top (icon space).
    VerticalGradient {
        top: Color,
        bottom: Color,
        y_top: f32,
        y_bottom: f32,
    },

    // Brightens toward `accent` at the center of the part's circle.
    Glow {
        base: Color,
        accent: Color,
        exponent: i32,
    },
}

// ----------------------------------------------
// IconPart
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum PartShape {
    Triangles(ArrayVec<Triangle, 3>),
    Circle(Circle),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IconPart {
    pub name: &'static str,
    pub shape: PartShape,
    pub paint: IconPaint,
}

impl IconPart {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        match &self.shape {
            PartShape::Triangles(triangles) => triangles.iter().any(|tri| tri.contains(p)),
            PartShape::Circle(circle) => circle.contains(p),
        }
    }

    pub fn color_at(&self, p: Vec2) -> Color {
        match self.paint {
            IconPaint::Solid(color) => color,
            IconPaint::VerticalGradient { top, bottom, y_top, y_bottom } => {
                let span = y_top - y_bottom;
                let t = if span != 0.0 { ((p.y - y_bottom) / span).clamp(0.0, 1.0) } else { 1.0 };
                lerp(bottom, top, t)
            }
            IconPaint::Glow { base, accent, exponent } => {
                let PartShape::Circle(circle) = self.shape else {
                    return base;
                };
                let glow = 1.0 - smoothstep(0.0, circle.radius, circle.distance_to_center(p));
                lerp(base, accent, glow.powi(exponent))
            }
        }
    }

    fn for_each_point(&self, mut visitor: impl FnMut(Vec2)) {
        match &self.shape {
            PartShape::Triangles(triangles) => {
                for tri in triangles {
                    visitor(tri.a);
                    visitor(tri.b);
                    visitor(tri.c);
                }
            }
            PartShape::Circle(circle) => visitor(circle.center),
        }
    }
}

// ----------------------------------------------
// IconSample
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IconSample {
    pub color: Color,
    pub alpha: f32, // Coverage in (0,1].
}

impl IconSample {
    // Any visible coverage maps to at least 1/255.
    #[inline]
    pub fn alpha_byte(&self) -> u8 {
        unit_to_byte(self.alpha).max(1)
    }
}

// ----------------------------------------------
// IconShape
// ----------------------------------------------

const MAX_ICON_PARTS: usize = 4;
const MAX_OUTLINE_EDGES: usize = 8;

// Player plane sprite, nose pointing up (+Y), one unit = one trail pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct IconShape {
    // Highest priority first. The first part containing a point paints it.
    parts: ArrayVec<IconPart, MAX_ICON_PARTS>,
    // Silhouette edges of the filled triangles. Edges shared by
    // two triangles are interior and not listed here.
    outline: ArrayVec<Segment, MAX_OUTLINE_EDGES>,
    feather_width: f32,
    outline_color: Color,
}

impl IconShape {
    pub fn new(configs: &MinimapConfigs) -> Self {
        let size = configs.icon_size;
        let half_width = size * configs.fuselage_width_ratio;

        let nose = Vec2::new(0.0, size);
        let tail = Vec2::new(0.0, -size);
        let cockpit_left = Vec2::new(-half_width, 0.4 * size);
        let cockpit_right = Vec2::new(half_width, 0.4 * size);
        let tail_left = Vec2::new(-half_width, -0.8 * size);
        let tail_right = Vec2::new(half_width, -0.8 * size);
        let left_wingtip = Vec2::new(-1.5 * size, -0.75 * size);
        let right_wingtip = Vec2::new(1.5 * size, -0.75 * size);

        let mut parts = ArrayVec::new();

        parts.push(IconPart {
            name: "nose",
            shape: PartShape::Circle(Circle::new(nose, configs.nose_radius)),
            paint: IconPaint::Glow {
                base: configs.fuselage_color,
                accent: configs.cockpit_color,
                exponent: 2,
            },
        });

        parts.push(IconPart {
            name: "tail",
            shape: PartShape::Circle(Circle::new(tail, configs.tail_radius)),
            paint: IconPaint::Glow {
                base: configs.fuselage_color,
                accent: configs.thruster_color,
                exponent: 1,
            },
        });

        parts.push(IconPart {
            name: "wings",
            shape: PartShape::Triangles(ArrayVec::from_iter([
                Triangle::new(cockpit_left, left_wingtip, tail_left),
                Triangle::new(cockpit_right, right_wingtip, tail_right),
            ])),
            paint: IconPaint::Solid(configs.wing_color),
        });

        parts.push(IconPart {
            name: "fuselage",
            shape: PartShape::Triangles(ArrayVec::from([
                Triangle::new(nose, cockpit_left, cockpit_right),
                Triangle::new(cockpit_left, tail_left, tail_right),
                Triangle::new(cockpit_left, tail_right, cockpit_right),
            ])),
            paint: IconPaint::VerticalGradient {
                top: configs.fuselage_color,
                bottom: configs.fuselage_shade_color,
                y_top: size,
                y_bottom: -size,
            },
        });

        let outline = ArrayVec::from_iter([
            Segment::new(nose, cockpit_left),
            Segment::new(cockpit_left, left_wingtip),
            Segment::new(left_wingtip, tail_left),
            Segment::new(tail_left, tail_right),
            Segment::new(tail_right, right_wingtip),
            Segment::new(right_wingtip, cockpit_right),
            Segment::new(cockpit_right, nose),
        ]);

        Self {
            parts,
            outline,
            // A zero feather would make the coverage smoothstep 0/0.
            feather_width: configs.feather_width.max(f32::EPSILON),
            outline_color: configs.outline_color,
        }
    }

    #[inline]
    pub fn parts(&self) -> &[IconPart] {
        &self.parts
    }

    pub fn find_part(&self, name: &str) -> Option<&IconPart> {
        self.parts.iter().find(|part| part.name == name)
    }

    pub fn largest_radius(&self) -> f32 {
        self.parts.iter().fold(0.0f32, |largest, part| {
            match &part.shape {
                PartShape::Circle(circle) => largest.max(circle.radius),
                PartShape::Triangles(_) => largest,
            }
        })
    }

    // Icon-space bounds of every vertex and circle center, (min, max).
    pub fn extents(&self) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for part in &self.parts {
            part.for_each_point(|p| {
                min = min.min(p);
                max = max.max(p);
            });
        }
        (min, max)
    }

    // Distance from `p` to the icon's silhouette, positive inside.
    // Circle coverage extends the body: the result is the larger of the
    // outline distance and the circle depth, so a circle centered on a
    // body vertex (the nose tip) stays covered.
    pub fn coverage_distance(&self, p: Vec2) -> f32 {
        let mut distance = f32::NEG_INFINITY;

        let inside_body = self.parts.iter().any(|part| {
            matches!(part.shape, PartShape::Triangles(_)) && part.contains(p)
        });

        if inside_body {
            let edge_distance = self.outline
                .iter()
                .map(|edge| edge.distance_to(p))
                .fold(f32::MAX, f32::min);
            distance = distance.max(edge_distance);
        }

        for part in &self.parts {
            if let PartShape::Circle(circle) = &part.shape {
                if circle.contains(p) {
                    distance = distance.max(circle.depth(p));
                }
            }
        }

        distance
    }

    // Color and coverage of the icon at icon-space point `p`,
    // or None if the point is not covered.
    pub fn sample(&self, p: Vec2) -> Option<IconSample> {
        let part = self.parts.iter().find(|part| part.contains(p))?;

        let distance = self.coverage_distance(p);
        let alpha = smoothstep(0.0, self.feather_width, distance);
        if alpha <= 0.0 {
            return None;
        }

        // Darken toward the outline color over the inner half of the feather.
        let fill = part.color_at(p);
        let edge_t = smoothstep(self.feather_width * 0.5, self.feather_width, distance);
        let color = lerp(self.outline_color, fill, edge_t);

        Some(IconSample { color, alpha })
    }

    // Composites the icon rotated counter-clockwise by `angle_radians` into
    // `target`, centered at pixel `center`. Icon +Y maps to decreasing rows.
    // Returns the number of pixels written.
    pub fn rasterize(&self, target: &mut TrailBuffer, center: (i32, i32), angle_radians: f32) -> usize {
        let (min_x, min_y, max_x, max_y) = self.pixel_bounds(angle_radians);
        let (sin_a, cos_a) = angle_radians.sin_cos();

        let mut pixels_written = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (fx, fy) = (x as f32, y as f32);

                // Back into the unrotated icon space.
                let local = Vec2::new((fx * cos_a) + (fy * sin_a),
                                      (fy * cos_a) - (fx * sin_a));

                if let Some(sample) = self.sample(local) {
                    let (px, py) = (center.0 + x, center.1 - y);
                    if TrailBuffer::is_within_bounds(px, py) {
                        target.set_pixel_alpha(px, py, sample.color, sample.alpha_byte());
                        pixels_written += 1;
                    }
                }
            }
        }

        pixels_written
    }

    // Inclusive pixel rectangle (min_x, min_y, max_x, max_y) relative to the
    // icon center that covers the rotated icon plus radii and feather.
    pub fn pixel_bounds(&self, angle_radians: f32) -> (i32, i32, i32, i32) {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);

        for part in &self.parts {
            part.for_each_point(|p| {
                let rotated = p.rotate(angle_radians);
                min = min.min(rotated);
                max = max.max(rotated);
            });
        }

        let margin = self.largest_radius() + self.feather_width;

        ((min.x - margin).floor() as i32,
         (min.y - margin).floor() as i32,
         (max.x + margin).ceil() as i32,
         (max.y + margin).ceil() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::approx_equal;

    fn default_icon() -> IconShape {
        IconShape::new(&MinimapConfigs::default())
    }

    fn rasterized_default_icon() -> TrailBuffer {
        let mut buffer = TrailBuffer::new();
        default_icon().rasterize(&mut buffer, TrailBuffer::center(), 0.0);
        buffer
    }

    fn alpha_at_icon_point(buffer: &TrailBuffer, x: i32, y: i32) -> u8 {
        let (cx, cy) = TrailBuffer::center();
        buffer.get(cx + x, cy - y).map_or(0, |pixel| pixel.a)
    }

    #[test]
    fn test_part_priority_order() {
        let icon = default_icon();
        let names: Vec<_> = icon.parts().iter().map(|part| part.name).collect();
        assert_eq!(names, ["nose", "tail", "wings", "fuselage"]);
    }

    #[test]
    fn test_default_extents() {
        let icon = default_icon();
        let (min, max) = icon.extents();
        assert_eq!(min, Vec2::new(-22.5, -15.0));
        assert_eq!(max, Vec2::new(22.5, 15.0));
        assert_eq!(icon.largest_radius(), 4.0);
        assert_eq!(icon.pixel_bounds(0.0), (-28, -20, 28, 20));
    }

    #[test]
    fn test_interior_pixels_are_covered() {
        let buffer = rasterized_default_icon();
        let icon = default_icon();

        let (min_x, min_y, max_x, max_y) = icon.pixel_bounds(0.0);
        let mut interior_count = 0;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32, y as f32);
                let strictly_inside = icon.parts().iter().any(|part| match &part.shape {
                    PartShape::Circle(circle) => circle.contains(p),
                    PartShape::Triangles(_) => part.contains(p) && icon.coverage_distance(p) > 0.0,
                });
                if strictly_inside {
                    interior_count += 1;
                    assert!(alpha_at_icon_point(&buffer, x, y) > 0, "pixel ({x},{y}) not covered");
                }
            }
        }

        assert!(interior_count > 100);
    }

    #[test]
    fn test_seams_and_nose_tip_are_covered() {
        let buffer = rasterized_default_icon();
        // Nose tip, shared with the fuselage vertex.
        assert!(alpha_at_icon_point(&buffer, 0, 15) > 0);
        // Interior edge between the fuselage triangles.
        assert!(alpha_at_icon_point(&buffer, 0, 0) > 0);
        // Wing root, where wing and fuselage triangles meet.
        assert!(alpha_at_icon_point(&buffer, -3, -5) > 0);
        // Tail thruster center.
        assert!(alpha_at_icon_point(&buffer, 0, -15) > 0);
    }

    #[test]
    fn test_pixels_outside_bounds_stay_clear() {
        let buffer = rasterized_default_icon();
        let (cx, cy) = TrailBuffer::center();
        let (min_x, min_y, max_x, max_y) = default_icon().pixel_bounds(0.0);

        for row in 0..256 {
            for column in 0..256 {
                let (x, y) = (column - cx, cy - row);
                if x < min_x || x > max_x || y < min_y || y > max_y {
                    assert_eq!(buffer.get(column, row).unwrap().a, 0);
                }
            }
        }

        // Well outside any feature.
        assert_eq!(alpha_at_icon_point(&buffer, 0, 25), 0);
        assert_eq!(alpha_at_icon_point(&buffer, 26, 0), 0);
        assert_eq!(alpha_at_icon_point(&buffer, 10, 10), 0);
    }

    #[test]
    fn test_color_priority() {
        let configs = MinimapConfigs::default();
        let icon = default_icon();

        // Deep inside the left wing, away from any outline.
        let wing = icon.sample(Vec2::new(-10.0, -6.0)).unwrap();
        assert_eq!(wing.color, configs.wing_color);
        assert_eq!(wing.alpha, 1.0);

        // Nose center is the full cockpit color.
        let nose = icon.sample(Vec2::new(0.0, 15.0)).unwrap();
        assert_eq!(nose.color, configs.cockpit_color);

        // Tail center is the full thruster color.
        let tail = icon.sample(Vec2::new(0.0, -15.0)).unwrap();
        assert_eq!(tail.color, configs.thruster_color);
    }

    #[test]
    fn test_fuselage_gradient() {
        let configs = MinimapConfigs::default();
        let icon = default_icon();
        let fuselage = icon.find_part("fuselage").unwrap();

        // t = (y + size) / (2 * size)
        let color = fuselage.color_at(Vec2::new(0.0, 0.0));
        let expected = lerp(configs.fuselage_shade_color, configs.fuselage_color, 0.5);
        assert!(approx_equal(color.r, expected.r, 1e-6));
        assert!(approx_equal(color.g, expected.g, 1e-6));
        assert!(approx_equal(color.b, expected.b, 1e-6));

        assert_eq!(fuselage.color_at(Vec2::new(0.0, 15.0)), configs.fuselage_color);
        assert_eq!(fuselage.color_at(Vec2::new(0.0, -15.0)), configs.fuselage_shade_color);
    }

    #[test]
    fn test_outline_darkening_near_edges() {
        let configs = MinimapConfigs::default();
        let icon = default_icon();

        // Just inside the trailing edge of the fuselage (y = -12), clear of the tail circle.
        let sample = icon.sample(Vec2::new(-2.5, -11.8)).unwrap();
        assert!(sample.alpha > 0.0 && sample.alpha < 1.0);
        let fill = icon.find_part("fuselage").unwrap().color_at(Vec2::new(-2.5, -11.8));
        assert_ne!(sample.color, fill);
        assert!(sample.color.r < fill.r);
        assert!(sample.color.r >= configs.outline_color.r);
    }

    #[test]
    fn test_rotated_rasterization() {
        let icon = default_icon();
        let mut buffer = TrailBuffer::new();
        let written = icon.rasterize(&mut buffer, TrailBuffer::center(), std::f32::consts::FRAC_PI_2);
        assert!(written > 0);

        // A quarter turn counter-clockwise moves the nose from +Y to -X.
        assert!(alpha_at_icon_point(&buffer, -15, 0) > 0);
        assert_eq!(alpha_at_icon_point(&buffer, 0, 15), 0);
    }

    #[test]
    fn test_rasterize_clips_at_buffer_edges() {
        let icon = default_icon();
        let mut buffer = TrailBuffer::new();
        let written = icon.rasterize(&mut buffer, (0, 0), 0.0);
        assert!(written > 0);
        assert_eq!(written, buffer.covered_pixel_count());
    }

    #[test]
    fn test_degenerate_icon_does_not_panic() {
        let configs = MinimapConfigs {
            icon_size: 0.0,
            nose_radius: 0.0,
            tail_radius: 0.0,
            ..MinimapConfigs::default()
        };
        let icon = IconShape::new(&configs);
        let mut buffer = TrailBuffer::new();
        icon.rasterize(&mut buffer, TrailBuffer::center(), 0.3);

        assert!(buffer.as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_zero_feather_width_stays_finite() {
        let configs = MinimapConfigs {
            feather_width: 0.0,
            ..MinimapConfigs::default()
        };
        let icon = IconShape::new(&configs);

        let (min_x, min_y, max_x, max_y) = icon.pixel_bounds(0.0);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some(sample) = icon.sample(Vec2::new(x as f32, y as f32)) {
                    assert!(!sample.alpha.is_nan(), "NaN coverage at ({x},{y})");
                    assert!(!sample.color.r.is_nan() && !sample.color.g.is_nan() && !sample.color.b.is_nan());
                }
            }
        }

        // Hard edges: anything inside is fully covered with its fill color.
        let edge = icon.sample(Vec2::new(-2.5, -11.8)).unwrap();
        assert_eq!(edge.alpha, 1.0);
        assert_eq!(edge.color, icon.find_part("fuselage").unwrap().color_at(Vec2::new(-2.5, -11.8)));

        let mut buffer = TrailBuffer::new();
        icon.rasterize(&mut buffer, TrailBuffer::center(), 0.0);
        assert_eq!(alpha_at_icon_point(&buffer, -10, -6), 255);
    }
}
