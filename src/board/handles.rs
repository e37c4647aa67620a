//! Edit handles for selected drawings
//!
//! Each drawing kind gets a strategy that knows where its handles sit and
//! how dragging one reshapes the drawing. Dispatch happens once through
//! [`strategy_for`].

use crate::pitch::Point;
use crate::rasterizer::{bounds_of, bounds_of_points};
use super::model::{Drawing, DrawingKind};

/// Per-kind handle placement and drag rules
pub trait HandleStrategy {
    /// Handle positions in logical space, in index order
    fn handles(&self, d: &Drawing) -> Vec<Point>;

    /// Reshape `d` for handle `index` dragged to `to`
    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point);
}

/// Start and end points of straight line kinds
struct EndpointHandles;

/// Four corners; the corner opposite the dragged one stays put
struct CornerHandles;

/// Top, right, bottom, left; the centre stays put and the ellipse
/// resizes symmetrically along the dragged axis
struct EllipseHandles;

/// One handle per vertex
struct VertexHandles;

/// The single control point of a curved arrow
struct ControlPointHandle;

/// Text labels are moved by retyping only
struct NoHandles;

pub fn strategy_for(kind: DrawingKind) -> &'static dyn HandleStrategy {
    match kind {
        DrawingKind::Line | DrawingKind::Arrow | DrawingKind::RunArrow => &EndpointHandles,
        DrawingKind::Rectangle | DrawingKind::Zone => &CornerHandles,
        DrawingKind::Ellipse => &EllipseHandles,
        DrawingKind::Triangle => &VertexHandles,
        DrawingKind::CurvedArrow => &ControlPointHandle,
        DrawingKind::Text => &NoHandles,
    }
}

pub fn handle_points(d: &Drawing) -> Vec<Point> {
    strategy_for(d.kind).handles(d)
}

pub fn apply_handle_drag(d: &mut Drawing, index: usize, to: Point) {
    strategy_for(d.kind).apply_drag(d, index, to);
}

impl HandleStrategy for EndpointHandles {
    fn handles(&self, d: &Drawing) -> Vec<Point> {
        vec![d.start, d.end]
    }

    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point) {
        match index {
            0 => d.start = to,
            1 => d.end = to,
            _ => {}
        }
    }
}

fn corners(min: Point, max: Point) -> [Point; 4] {
    [min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)]
}

impl HandleStrategy for CornerHandles {
    fn handles(&self, d: &Drawing) -> Vec<Point> {
        let (min, max) = bounds_of(d.start, d.end);
        corners(min, max).to_vec()
    }

    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point) {
        if index >= 4 {
            return;
        }
        let (min, max) = bounds_of(d.start, d.end);
        let anchor = corners(min, max)[(index + 2) % 4];
        d.start = anchor;
        d.end = to;
    }
}

impl HandleStrategy for EllipseHandles {
    fn handles(&self, d: &Drawing) -> Vec<Point> {
        let (c, rx, ry) = d.ellipse();
        vec![
            Point::new(c.x, c.y - ry),
            Point::new(c.x + rx, c.y),
            Point::new(c.x, c.y + ry),
            Point::new(c.x - rx, c.y),
        ]
    }

    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point) {
        let (c, mut rx, mut ry) = d.ellipse();
        match index {
            0 | 2 => ry = (to.y - c.y).abs(),
            1 | 3 => rx = (to.x - c.x).abs(),
            _ => return,
        }
        let r = Point::new(rx, ry);
        d.start = c - r;
        d.end = c + r;
    }
}

impl HandleStrategy for VertexHandles {
    fn handles(&self, d: &Drawing) -> Vec<Point> {
        d.points.clone()
    }

    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point) {
        let Some(v) = d.points.get_mut(index) else {
            return;
        };
        *v = to;
        if let Some((min, max)) = bounds_of_points(&d.points) {
            d.start = min;
            d.end = max;
        }
    }
}

impl HandleStrategy for ControlPointHandle {
    fn handles(&self, d: &Drawing) -> Vec<Point> {
        vec![d.curve_control()]
    }

    fn apply_drag(&self, d: &mut Drawing, index: usize, to: Point) {
        if index != 0 {
            return;
        }
        match d.points.first_mut() {
            Some(c) => *c = to,
            None => d.points.push(to),
        }
    }
}

impl HandleStrategy for NoHandles {
    fn handles(&self, _d: &Drawing) -> Vec<Point> {
        Vec::new()
    }

    fn apply_drag(&self, _d: &mut Drawing, _index: usize, _to: Point) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::model::{DrawingId, Pen};

    fn shape(kind: DrawingKind, a: Point, b: Point) -> Drawing {
        Drawing::shape(DrawingId(1), kind, a, b, Pen::default())
    }

    #[test]
    fn test_rectangle_corner_keeps_opposite_fixed() {
        let mut d = shape(DrawingKind::Rectangle, Point::new(10.0, 10.0), Point::new(50.0, 40.0));
        // Drag the top-left corner outward
        apply_handle_drag(&mut d, 0, Point::new(0.0, 5.0));
        assert_eq!(d.bounds(), (Point::new(0.0, 5.0), Point::new(50.0, 40.0)));
        // Drag bottom-right past the anchor: the box flips but stays anchored
        apply_handle_drag(&mut d, 2, Point::new(-20.0, -10.0));
        assert_eq!(d.bounds(), (Point::new(-20.0, -10.0), Point::new(0.0, 5.0)));
    }

    #[test]
    fn test_ellipse_resizes_about_center() {
        let mut d = shape(DrawingKind::Ellipse, Point::new(0.0, 0.0), Point::new(100.0, 60.0));
        let (c0, _, ry0) = d.ellipse();
        apply_handle_drag(&mut d, 1, Point::new(80.0, 999.0));
        let (c, rx, ry) = d.ellipse();
        assert_eq!(c, c0);
        assert!((rx - 30.0).abs() < 0.001);
        assert!((ry - ry0).abs() < 0.001);
        apply_handle_drag(&mut d, 0, Point::new(0.0, 10.0));
        let (c, _, ry) = d.ellipse();
        assert_eq!(c, c0);
        assert!((ry - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_triangle_vertex_moves_and_bbox_follows() {
        let mut d = shape(DrawingKind::Triangle, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        apply_handle_drag(&mut d, 0, Point::new(50.0, -40.0));
        assert_eq!(d.points[0], Point::new(50.0, -40.0));
        assert_eq!(d.start, Point::new(0.0, -40.0));
        assert_eq!(d.end, Point::new(100.0, 100.0));
        // Out of range index is ignored
        let before = d.clone();
        apply_handle_drag(&mut d, 5, Point::ZERO);
        assert_eq!(d, before);
    }

    #[test]
    fn test_curve_has_single_control_handle() {
        let mut d = shape(DrawingKind::CurvedArrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(handle_points(&d).len(), 1);
        apply_handle_drag(&mut d, 0, Point::new(50.0, -80.0));
        assert_eq!(d.curve_control(), Point::new(50.0, -80.0));
        assert_eq!((d.start, d.end), (Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_text_has_no_handles() {
        let d = Drawing::label(DrawingId(3), Point::new(1.0, 1.0), "HI", Pen::default());
        assert!(handle_points(&d).is_empty());
    }
}
