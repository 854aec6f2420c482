use crate::utils::Vec2;

// ----------------------------------------------
// Triangle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec2,
    pub b: Vec2,
    pub c: Vec2,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    // Twice the signed area. Positive for counter-clockwise winding.
    #[inline]
    pub fn doubled_area(&self) -> f32 {
        (self.b - self.a).perp_dot(self.c - self.a)
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.doubled_area() == 0.0
    }

    #[inline]
    pub fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    // Half-plane sign test. Points on an edge count as inside.
    // A degenerate triangle only contains the points on its segments.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.is_degenerate() {
            return self.edges().iter().any(|edge| edge.distance_to(p) == 0.0);
        }

        let d1 = edge_function(p, self.b, self.a);
        let d2 = edge_function(p, self.c, self.b);
        let d3 = edge_function(p, self.a, self.c);

        let has_neg = (d1 < 0.0) || (d2 < 0.0) || (d3 < 0.0);
        let has_pos = (d1 > 0.0) || (d2 > 0.0) || (d3 > 0.0);

        !(has_neg && has_pos)
    }
}

// Which side of the line through `from` and `to` the point lies on.
#[inline]
fn edge_function(p: Vec2, from: Vec2, to: Vec2) -> f32 {
    (p.x - from.x) * (to.y - from.y) - (to.x - from.x) * (p.y - from.y)
}

// ----------------------------------------------
// Segment
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    // Euclidean distance to the closest point of the segment.
    pub fn distance_to(&self, p: Vec2) -> f32 {
        let pv = p - self.from;
        let vv = self.to - self.from;

        let length_sqr = vv.length_squared();
        if length_sqr <= 0.0 {
            return pv.length();
        }

        let h = (pv.dot(vv) / length_sqr).clamp(0.0, 1.0);
        (pv - vv * h).length()
    }
}

// ----------------------------------------------
// Circle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn distance_to_center(&self, p: Vec2) -> f32 {
        p.distance(self.center)
    }

    // Open disc: points exactly on the boundary are outside.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.distance_to_center(p) < self.radius
    }

    // Positive inside, zero on the boundary.
    #[inline]
    pub fn depth(&self, p: Vec2) -> f32 {
        self.radius - self.distance_to_center(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0))
    }

    #[test]
    fn test_triangle_contains_interior_and_boundary() {
        let tri = unit_triangle();
        assert!(tri.contains(Vec2::new(1.0, 1.0)));
        // Edges and vertices are inclusive.
        assert!(tri.contains(Vec2::new(2.0, 0.0)));
        assert!(tri.contains(Vec2::new(2.0, 2.0)));
        assert!(tri.contains(Vec2::new(0.0, 4.0)));
        assert!(!tri.contains(Vec2::new(3.0, 3.0)));
        assert!(!tri.contains(Vec2::new(-0.5, 1.0)));
    }

    #[test]
    fn test_triangle_winding_does_not_matter() {
        let tri = unit_triangle();
        let flipped = Triangle::new(tri.a, tri.c, tri.b);
        assert!(tri.doubled_area() > 0.0);
        assert!(flipped.doubled_area() < 0.0);
        assert!(flipped.contains(Vec2::new(1.0, 1.0)));
        assert!(!flipped.contains(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_degenerate_triangles() {
        let collinear = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        assert!(collinear.is_degenerate());
        assert!(collinear.contains(Vec2::new(1.5, 1.5)));
        // On the supporting line but past the end points.
        assert!(!collinear.contains(Vec2::new(3.0, 3.0)));
        assert!(!collinear.contains(Vec2::new(1.0, 0.0)));

        let point = Triangle::new(Vec2::splat(5.0), Vec2::splat(5.0), Vec2::splat(5.0));
        assert!(point.contains(Vec2::splat(5.0)));
        assert!(!point.contains(Vec2::splat(5.5)));
    }

    #[test]
    fn test_segment_distance() {
        let seg = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(seg.distance_to(Vec2::new(5.0, 3.0)), 3.0);
        // Projection clamped to the end points.
        assert_eq!(seg.distance_to(Vec2::new(-3.0, 4.0)), 5.0);
        assert_eq!(seg.distance_to(Vec2::new(13.0, -4.0)), 5.0);

        let zero_length = Segment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        let dist = zero_length.distance_to(Vec2::new(4.0, 5.0));
        assert!(!dist.is_nan());
        assert_eq!(dist, 5.0);
    }

    #[test]
    fn test_circle_is_open() {
        let circle = Circle::new(Vec2::new(0.0, 15.0), 3.5);
        assert!(circle.contains(Vec2::new(0.0, 12.0)));
        assert!(!circle.contains(Vec2::new(0.0, 11.5)));
        assert_eq!(circle.depth(Vec2::new(0.0, 15.0)), 3.5);
    }
}
