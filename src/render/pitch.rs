//! Grass and pitch markings

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::pitch::markings::*;
use crate::pitch::{self, Point, Projection, PITCH_HEIGHT, PITCH_WIDTH, PLAY_LENGTH};
use crate::rasterizer::Framebuffer;
use super::palette;

const STRIPES: usize = 12;
const LINE_WIDTH: f32 = 2.0;
const SPOT_RADIUS: f32 = 3.0;

/// Points along a circular arc, angles in radians (screen space, y down)
pub(super) fn arc_points(center: Point, radius: f32, from: f32, to: f32, segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let a = from + (to - from) * i as f32 / segments as f32;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

pub(super) fn draw_pitch(fb: &mut Framebuffer, proj: &Projection) {
    draw_grass(fb, proj);

    let line = |fb: &mut Framebuffer, pts: &[Point], closed: bool| {
        let screen: Vec<Point> = pts.iter().map(|p| proj.to_screen(*p)).collect();
        fb.stroke_polyline(&screen, closed, proj.len(LINE_WIDTH).max(1.0), palette::LINE);
    };

    let (l, r, t, b) = (pitch::left_line(), pitch::right_line(), pitch::top_line(), pitch::bottom_line());
    let mid_x = PITCH_WIDTH * 0.5;
    let mid_y = PITCH_HEIGHT * 0.5;

    // Touchlines, goal lines, halfway line
    line(fb, &[Point::new(l, t), Point::new(r, t), Point::new(r, b), Point::new(l, b)], true);
    line(fb, &[Point::new(mid_x, t), Point::new(mid_x, b)], false);

    // Centre circle and spot
    let centre = pitch::center();
    line(fb, &arc_points(centre, CENTER_CIRCLE_RADIUS, 0.0, TAU, 64), true);
    fb.fill_circle(proj.to_screen(centre), proj.len(SPOT_RADIUS).max(1.5), palette::LINE);

    for (goal_x, dir) in [(l, 1.0f32), (r, -1.0f32)] {
        let boxes = [
            (PENALTY_AREA_DEPTH, PENALTY_AREA_WIDTH),
            (GOAL_AREA_DEPTH, GOAL_AREA_WIDTH),
        ];
        for (depth, width) in boxes {
            let x = goal_x + depth * dir;
            let half = width * 0.5;
            line(
                fb,
                &[
                    Point::new(goal_x, mid_y - half),
                    Point::new(x, mid_y - half),
                    Point::new(x, mid_y + half),
                    Point::new(goal_x, mid_y + half),
                ],
                false,
            );
        }

        // Penalty spot and the arc outside the box
        let spot = Point::new(goal_x + PENALTY_SPOT_DISTANCE * dir, mid_y);
        fb.fill_circle(proj.to_screen(spot), proj.len(SPOT_RADIUS).max(1.5), palette::LINE);
        let sweep = ((PENALTY_AREA_DEPTH - PENALTY_SPOT_DISTANCE) / PENALTY_ARC_RADIUS).acos();
        let facing = if dir > 0.0 { 0.0 } else { PI };
        line(fb, &arc_points(spot, PENALTY_ARC_RADIUS, facing - sweep, facing + sweep, 24), false);

        // Goal frame behind the line
        let back = goal_x - GOAL_DEPTH * dir;
        let half = GOAL_WIDTH * 0.5;
        line(
            fb,
            &[
                Point::new(goal_x, mid_y - half),
                Point::new(back, mid_y - half),
                Point::new(back, mid_y + half),
                Point::new(goal_x, mid_y + half),
            ],
            false,
        );
    }

    // Corner arcs, each a quarter turn into the field
    let corners = [
        (Point::new(l, t), 0.0),
        (Point::new(r, t), FRAC_PI_2),
        (Point::new(r, b), PI),
        (Point::new(l, b), PI + FRAC_PI_2),
    ];
    for (corner, start) in corners {
        line(fb, &arc_points(corner, CORNER_ARC_RADIUS, start, start + FRAC_PI_2, 8), false);
    }
}

/// Mown stripes across the full logical pitch
fn draw_grass(fb: &mut Framebuffer, proj: &Projection) {
    let stripe = PLAY_LENGTH / STRIPES as f32;
    let left = pitch::left_line();
    let top_left = proj.to_screen(Point::ZERO);
    let bottom_right = proj.to_screen(Point::new(PITCH_WIDTH, PITCH_HEIGHT));
    fb.fill_rect(top_left, bottom_right, palette::GRASS_DARK);

    for i in (0..STRIPES).step_by(2) {
        let x0 = left + stripe * i as f32;
        let a = proj.to_screen(Point::new(x0, 0.0));
        let b = proj.to_screen(Point::new(x0 + stripe, PITCH_HEIGHT));
        fb.fill_rect(a, b, palette::GRASS_LIGHT);
    }
}
