//! Tactical annotations

use crate::board::model::TEXT_SCALE;
use crate::board::{Drawing, DrawingKind};
use crate::pitch::{Point, Projection};
use crate::rasterizer::{Color, Framebuffer};
use super::stroke_px;

/// Alpha factor for the fill of filled shapes
const FILL_ALPHA: f32 = 0.35;
/// Zones are mostly fill
const ZONE_ALPHA: f32 = 0.28;
const ARROW_HEAD_MIN: f32 = 10.0;

/// Paint one drawing. `alpha` scales its opacity (previews use 0.5).
pub fn draw_drawing(fb: &mut Framebuffer, proj: &Projection, d: &Drawing, alpha: f32) {
    let color = d.color.fade(alpha);
    let width = stroke_px(proj, d.stroke_width);
    let s = |p: Point| proj.to_screen(p);

    match d.kind {
        DrawingKind::Line => fb.draw_line(s(d.start), s(d.end), width, color),
        DrawingKind::Arrow => fb.draw_line(s(d.start), s(d.end), width, color),
        DrawingKind::RunArrow => {
            let dash = proj.len(12.0).max(3.0);
            let gap = proj.len(8.0).max(2.0);
            fb.draw_dashed_line(s(d.start), s(d.end), width, dash, gap, color);
        }
        DrawingKind::CurvedArrow => {
            let (outline, _) = d.outline();
            let screen: Vec<Point> = outline.iter().map(|p| s(*p)).collect();
            fb.stroke_polyline(&screen, false, width, color);
        }
        DrawingKind::Rectangle | DrawingKind::Zone | DrawingKind::Triangle => {
            let (outline, _) = d.outline();
            let screen: Vec<Point> = outline.iter().map(|p| s(*p)).collect();
            if d.filled {
                let fill = if d.kind == DrawingKind::Zone { ZONE_ALPHA } else { FILL_ALPHA };
                fb.fill_polygon(&screen, color.fade(fill));
            }
            fb.stroke_polyline(&screen, true, width, color);
        }
        DrawingKind::Ellipse => {
            let (c, rx, ry) = d.ellipse();
            let (c, rx, ry) = (s(c), proj.len(rx), proj.len(ry));
            if d.filled {
                fb.fill_ellipse(c, rx, ry, color.fade(FILL_ALPHA));
            }
            fb.stroke_ellipse(c, rx, ry, width, color);
        }
        DrawingKind::Text => {
            if let Some(text) = &d.text {
                fb.draw_text(s(d.start), text, proj.len(TEXT_SCALE), color);
            }
        }
    }

    if d.kind.has_arrow_head() {
        // Curved heads follow the tangent at the end of the curve
        let from = if d.kind == DrawingKind::CurvedArrow { d.curve_control() } else { d.start };
        arrow_head(fb, proj, from, d.end, d.stroke_width, color);
    }
}

/// Filled triangular head at `tip`, pointing away from `from`
fn arrow_head(fb: &mut Framebuffer, proj: &Projection, from: Point, tip: Point, stroke: f32, color: Color) {
    let dir = (tip - from).normalize();
    if dir == Point::ZERO {
        return;
    }
    let size = (stroke * 3.0).max(ARROW_HEAD_MIN);
    let base = tip - dir * size;
    let side = dir.perp() * (size * 0.5);
    let pts = [tip, base + side, base - side].map(|p| proj.to_screen(p));
    fb.fill_polygon(&pts, color);
}
