//! UI Theme - shared colors and sizes for the window chrome
//!
//! The board itself is drawn by the software renderer with its own palette;
//! these only style the toolbar, side panel and status bar.

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Window background behind everything
pub const BG_COLOR: Color = Color::new(0.06, 0.09, 0.16, 1.0);

/// Toolbar and side panel background
pub const HEADER_COLOR: Color = Color::new(0.09, 0.13, 0.22, 1.0);

pub const TEXT_COLOR: Color = Color::new(0.89, 0.91, 0.94, 1.0);

pub const TEXT_DIM: Color = Color::new(0.58, 0.64, 0.72, 1.0);

/// Active tool / toggled-on button (cyan)
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

pub const BUTTON_HOVER: Color = Color::new(0.2, 0.25, 0.35, 1.0);

pub const BUTTON_PRESSED: Color = Color::new(0.25, 0.32, 0.45, 1.0);

pub const DIVIDER: Color = Color::new(0.31, 0.31, 0.35, 1.0);

/// Status bar text for errors
pub const ERROR_COLOR: Color = Color::new(0.97, 0.44, 0.44, 1.0);

// =============================================================================
// Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 16.0;

pub const FONT_SIZE_CONTENT: f32 = 14.0;

pub const TOOLBAR_ROW_HEIGHT: f32 = 32.0;

pub const SIDE_PANEL_WIDTH: f32 = 240.0;

pub const STATUS_BAR_HEIGHT: f32 = 24.0;

/// Colors offered for the drawing pen
pub const PEN_SWATCHES: [crate::rasterizer::Color; 6] = [
    crate::rasterizer::Color::YELLOW,
    crate::rasterizer::Color::WHITE,
    crate::rasterizer::Color::RED,
    crate::rasterizer::Color::BLUE,
    crate::rasterizer::Color::new(34, 197, 94),
    crate::rasterizer::Color::new(15, 23, 42),
];

/// Stroke widths offered for the drawing pen
pub const PEN_WIDTHS: [f32; 3] = [2.0, 3.0, 5.0];

/// Convert a board color for macroquad drawing
pub fn to_mq(c: crate::rasterizer::Color) -> Color {
    let [r, g, b, a] = c.to_bytes();
    Color::from_rgba(r, g, b, a)
}
