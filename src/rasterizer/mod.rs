//! Software rasterizer for the tactics board
//!
//! The board is painted into a plain RGBA framebuffer so the same pixels can
//! be shown on screen, saved as a screenshot, or captured into a recording.
//!
//! # Module Organization
//!
//! - `types` - Color
//! - `math` - Vec2 and 2D geometry helpers (segment distance, polygons, curves)
//! - `framebuffer` - Framebuffer and drawing primitives
//! - `font` - embedded TTF glyphs (fontdue) for numbers and labels

pub mod font;
pub mod framebuffer;
pub mod math;
pub mod types;

pub use framebuffer::Framebuffer;
pub use math::{
    bounds_of, bounds_of_points, ellipse_points, point_in_polygon, point_to_polyline_distance,
    point_to_segment_distance, quad_bezier_points, Vec2,
};
pub use types::Color;
