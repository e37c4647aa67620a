//! 2D vector math shared by the projection, hit-testing and raster code

use std::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).len()
    }

    pub fn normalize(self) -> Vec2 {
        let l = self.len();
        if l == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.x / l, self.y / l)
    }

    /// Perpendicular (rotated 90 degrees counter-clockwise in screen space)
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn midpoint(self, other: Vec2) -> Vec2 {
        self.lerp(other, 0.5)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

/// Distance from point `p` to the segment `a`-`b`.
pub fn point_to_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    let len_sq = d.dot(d);

    if len_sq < 1e-6 {
        // Segment is essentially a point
        return p.distance(a);
    }

    // Project point onto line segment
    let t = ((p - a).dot(d) / len_sq).clamp(0.0, 1.0);
    p.distance(a + d * t)
}

/// Distance from `p` to the nearest edge of a polyline.
/// `closed` adds the segment from the last point back to the first.
pub fn point_to_polyline_distance(p: Vec2, points: &[Vec2], closed: bool) -> f32 {
    match points.len() {
        0 => f32::INFINITY,
        1 => p.distance(points[0]),
        n => {
            let mut best = f32::INFINITY;
            for i in 0..n - 1 {
                best = best.min(point_to_segment_distance(p, points[i], points[i + 1]));
            }
            if closed {
                best = best.min(point_to_segment_distance(p, points[n - 1], points[0]));
            }
            best
        }
    }
}

/// Even-odd point-in-polygon test. Works for any simple polygon.
pub fn point_in_polygon(p: Vec2, poly: &[Vec2]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Sample a quadratic Bezier curve into `segments + 1` points.
pub fn quad_bezier_points(start: Vec2, control: Vec2, end: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let a = start.lerp(control, t);
            let b = control.lerp(end, t);
            a.lerp(b, t)
        })
        .collect()
}

/// Sample an axis-aligned ellipse into `segments` points (closed loop, first point not repeated).
pub fn ellipse_points(center: Vec2, rx: f32, ry: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            Vec2::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect()
}

/// Normalized bounding box of two corner points: (min, max)
pub fn bounds_of(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    (
        Vec2::new(a.x.min(b.x), a.y.min(b.y)),
        Vec2::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Bounding box of an arbitrary point set, None when empty
pub fn bounds_of_points(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    let mut min = first;
    let mut max = first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}
