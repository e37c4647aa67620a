//! Viewports and screen <-> pitch projection
//!
//! A viewport names a rectangle of logical pitch space. The rectangle is
//! fitted uniformly into the drawing surface and centered, so circles stay
//! round whatever the window aspect ratio.

use serde::{Deserialize, Serialize};
use super::{Point, PITCH_HEIGHT, PITCH_WIDTH};

/// Logical-space rectangle visible in a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBounds {
    pub const fn new(origin_x: f32, origin_y: f32, width: f32, height: f32) -> Self {
        Self { origin_x, origin_y, width, height }
    }
}

/// Named viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Viewport {
    #[default]
    Full,
    HalfLeft,
    HalfRight,
    PenaltyLeft,
    PenaltyRight,
    CornerLeft,
    CornerRight,
    SmallSided,
}

impl Viewport {
    pub const ALL: [Viewport; 8] = [
        Viewport::Full,
        Viewport::HalfLeft,
        Viewport::HalfRight,
        Viewport::PenaltyLeft,
        Viewport::PenaltyRight,
        Viewport::CornerLeft,
        Viewport::CornerRight,
        Viewport::SmallSided,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Viewport::Full => "Full",
            Viewport::HalfLeft => "Left Half",
            Viewport::HalfRight => "Right Half",
            Viewport::PenaltyLeft => "Left Box",
            Viewport::PenaltyRight => "Right Box",
            Viewport::CornerLeft => "Left Corner",
            Viewport::CornerRight => "Right Corner",
            Viewport::SmallSided => "Small-Sided",
        }
    }

    /// Logical rectangle shown by this viewport
    pub fn bounds(self) -> ViewBounds {
        const BOX_W: f32 = 300.0;
        const BOX_H: f32 = 452.0;
        const BOX_Y: f32 = (PITCH_HEIGHT - BOX_H) * 0.5;
        const CORNER_W: f32 = 320.0;
        const CORNER_H: f32 = 240.0;

        match self {
            Viewport::Full => ViewBounds::new(0.0, 0.0, PITCH_WIDTH, PITCH_HEIGHT),
            Viewport::HalfLeft => ViewBounds::new(0.0, 0.0, PITCH_WIDTH * 0.5, PITCH_HEIGHT),
            Viewport::HalfRight => {
                ViewBounds::new(PITCH_WIDTH * 0.5, 0.0, PITCH_WIDTH * 0.5, PITCH_HEIGHT)
            }
            Viewport::PenaltyLeft => ViewBounds::new(0.0, BOX_Y, BOX_W, BOX_H),
            Viewport::PenaltyRight => ViewBounds::new(PITCH_WIDTH - BOX_W, BOX_Y, BOX_W, BOX_H),
            Viewport::CornerLeft => ViewBounds::new(0.0, 0.0, CORNER_W, CORNER_H),
            Viewport::CornerRight => ViewBounds::new(PITCH_WIDTH - CORNER_W, 0.0, CORNER_W, CORNER_H),
            Viewport::SmallSided => ViewBounds::new(160.0, 60.0, PITCH_WIDTH - 320.0, PITCH_HEIGHT - 120.0),
        }
    }
}

/// The on-screen box the board is drawn into.
/// `width`/`height` are in screen (logical) pixels; the backing framebuffer
/// has `pixel_ratio` device pixels per screen pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self { width, height, pixel_ratio }
    }

    /// True when nothing can be drawn
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.pixel_ratio > 0.0)
    }

    /// Framebuffer size in device pixels
    pub fn device_size(&self) -> (usize, usize) {
        if self.is_empty() {
            return (0, 0);
        }
        (
            (self.width * self.pixel_ratio).round() as usize,
            (self.height * self.pixel_ratio).round() as usize,
        )
    }
}

/// Uniform fit of a viewport rectangle into a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Logical point mapped to `offset`
    pub origin: Point,
    /// Surface pixels per logical unit (0 for an empty surface)
    pub scale: f32,
    /// Surface position of `origin`
    pub offset: Point,
}

impl Projection {
    /// Projection into screen pixels
    pub fn new(surface: Surface, view: Viewport) -> Self {
        let b = view.bounds();
        let origin = Point::new(b.origin_x, b.origin_y);
        if surface.width <= 0.0 || surface.height <= 0.0 || b.width <= 0.0 || b.height <= 0.0 {
            return Self { origin, scale: 0.0, offset: Point::ZERO };
        }
        let scale = (surface.width / b.width).min(surface.height / b.height);
        let offset = Point::new(
            (surface.width - b.width * scale) * 0.5,
            (surface.height - b.height * scale) * 0.5,
        );
        Self { origin, scale, offset }
    }

    /// Projection into device pixels (screen pixels times pixel ratio)
    pub fn device(surface: Surface, view: Viewport) -> Self {
        let p = Self::new(surface, view);
        let ratio = if surface.pixel_ratio > 0.0 { surface.pixel_ratio } else { 0.0 };
        Self {
            origin: p.origin,
            scale: p.scale * ratio,
            offset: p.offset * ratio,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.scale > 0.0)
    }

    pub fn to_screen(&self, p: Point) -> Point {
        self.offset + (p - self.origin) * self.scale
    }

    pub fn to_logical(&self, s: Point) -> Point {
        if self.is_degenerate() {
            return self.origin;
        }
        self.origin + (s - self.offset) * (1.0 / self.scale)
    }

    /// Convert a logical length to pixels
    pub fn len(&self, logical: f32) -> f32 {
        logical * self.scale
    }
}

/// Map a surface-relative screen coordinate into logical pitch space
pub fn to_logical(screen_x: f32, screen_y: f32, surface: Surface, view: Viewport) -> Point {
    Projection::new(surface, view).to_logical(Point::new(screen_x, screen_y))
}

/// Map a logical point to surface-relative screen coordinates
pub fn to_screen(p: Point, surface: Surface, view: Viewport) -> Point {
    Projection::new(surface, view).to_screen(p)
}
