//! Pitch geometry
//!
//! Logical pitch space is a fixed coordinate system independent of the
//! screen. The playing rectangle (touchlines and goal lines) sits inside a
//! margin so players can be parked on the border; goals stick out past the
//! goal lines into the margin.

pub mod viewport;

pub use viewport::{to_logical, to_screen, Projection, Surface, ViewBounds, Viewport};

use crate::rasterizer::Vec2;

/// Points in logical pitch space
pub type Point = Vec2;

/// Logical units per metre
pub const UNITS_PER_METER: f32 = 9.0;
/// Playing length (goal line to goal line), 105 m
pub const PLAY_LENGTH: f32 = 105.0 * UNITS_PER_METER;
/// Playing width (touchline to touchline), 68 m
pub const PLAY_WIDTH: f32 = 68.0 * UNITS_PER_METER;
/// Border around the playing rectangle
pub const PITCH_MARGIN: f32 = 40.0;
/// Total logical width including margins
pub const PITCH_WIDTH: f32 = PLAY_LENGTH + 2.0 * PITCH_MARGIN;
/// Total logical height including margins
pub const PITCH_HEIGHT: f32 = PLAY_WIDTH + 2.0 * PITCH_MARGIN;

/// Standard marking dimensions in logical units
pub mod markings {
    use super::UNITS_PER_METER as M;

    pub const CENTER_CIRCLE_RADIUS: f32 = 9.15 * M;
    pub const PENALTY_AREA_DEPTH: f32 = 16.5 * M;
    pub const PENALTY_AREA_WIDTH: f32 = 40.32 * M;
    pub const GOAL_AREA_DEPTH: f32 = 5.5 * M;
    pub const GOAL_AREA_WIDTH: f32 = 18.32 * M;
    pub const PENALTY_SPOT_DISTANCE: f32 = 11.0 * M;
    pub const PENALTY_ARC_RADIUS: f32 = 9.15 * M;
    pub const GOAL_WIDTH: f32 = 7.32 * M;
    /// How far the goal frame extends beyond the goal line
    pub const GOAL_DEPTH: f32 = 15.0;
    pub const CORNER_ARC_RADIUS: f32 = 1.0 * M;
}

/// Left goal line x
pub const fn left_line() -> f32 {
    PITCH_MARGIN
}

/// Right goal line x
pub const fn right_line() -> f32 {
    PITCH_WIDTH - PITCH_MARGIN
}

/// Top touchline y
pub const fn top_line() -> f32 {
    PITCH_MARGIN
}

/// Bottom touchline y
pub const fn bottom_line() -> f32 {
    PITCH_HEIGHT - PITCH_MARGIN
}

/// Centre spot
pub fn center() -> Point {
    Point::new(PITCH_WIDTH * 0.5, PITCH_HEIGHT * 0.5)
}

/// Clamp a point to the full logical pitch, margins included
pub fn clamp_to_pitch(p: Point) -> Point {
    Point::new(
        if p.x.is_finite() { p.x.clamp(0.0, PITCH_WIDTH) } else { PITCH_WIDTH * 0.5 },
        if p.y.is_finite() { p.y.clamp(0.0, PITCH_HEIGHT) } else { PITCH_HEIGHT * 0.5 },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_consistent() {
        assert_eq!(right_line() - left_line(), PLAY_LENGTH);
        assert_eq!(bottom_line() - top_line(), PLAY_WIDTH);
        assert_eq!(center(), Point::new(PITCH_WIDTH / 2.0, PITCH_HEIGHT / 2.0));
    }

    #[test]
    fn test_clamp_to_pitch() {
        assert_eq!(clamp_to_pitch(Point::new(-20.0, 5000.0)), Point::new(0.0, PITCH_HEIGHT));
        assert_eq!(clamp_to_pitch(Point::new(100.0, 200.0)), Point::new(100.0, 200.0));
        let nan = clamp_to_pitch(Point::new(f32::NAN, f32::INFINITY));
        assert!(nan.x >= 0.0 && nan.x <= PITCH_WIDTH);
        assert!(nan.y >= 0.0 && nan.y <= PITCH_HEIGHT);
    }
}
