//! Board renderer
//!
//! `render` paints a complete frame from a scene (players, ball, drawings)
//! and a set of options. It keeps no state between calls, so the animation
//! loop can call it every frame with interpolated positions.
//!
//! Paint order: pitch, zone overlay, committed drawings, preview, editing
//! overlays (movement paths, handles), players, ball, labels, inline editor.

mod drawings;
mod overlays;
mod pieces;
mod pitch;

use std::collections::BTreeMap;

use crate::board::{Ball, Drawing, DrawingId, MovePiece, Player, PlayerId};
use crate::photo::PhotoCache;
use crate::pitch::{Point, Projection, Surface, Viewport};
use crate::rasterizer::{Color, Framebuffer};

pub use drawings::draw_drawing;

/// Player circle radius in logical units
pub const PLAYER_RADIUS: f32 = 12.0;
/// Ball radius in logical units
pub const BALL_RADIUS: f32 = 6.0;

/// Colors used across the board
pub mod palette {
    use crate::rasterizer::Color;

    pub const SURROUND: Color = Color::new(20, 83, 45);
    pub const GRASS_LIGHT: Color = Color::new(52, 140, 72);
    pub const GRASS_DARK: Color = Color::new(44, 124, 63);
    pub const LINE: Color = Color::rgba(255, 255, 255, 225);

    pub const HOME: Color = Color::new(37, 99, 235);
    pub const HOME_KEEPER: Color = Color::new(234, 179, 8);
    pub const AWAY: Color = Color::new(220, 38, 38);
    pub const AWAY_KEEPER: Color = Color::new(22, 163, 74);

    pub const SELECTED: Color = Color::new(56, 232, 255);
    pub const ACTIVE_PIECE: Color = Color::new(255, 112, 67);
    pub const HANDLE: Color = Color::WHITE;
    pub const HANDLE_BORDER: Color = Color::new(15, 23, 42);
    pub const LABEL_BG: Color = Color::rgba(15, 23, 42, 190);
    pub const PATH: Color = Color::rgba(255, 255, 255, 200);
}

/// What to draw
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub players: &'a [Player],
    pub ball: &'a Ball,
    pub drawings: &'a [Drawing],
}

/// Inline text editor shown on the board
#[derive(Debug, Clone, Copy)]
pub struct EditorOverlay<'a> {
    /// Top-left of the text in logical space
    pub at: Point,
    pub text: &'a str,
    /// Cursor byte offset
    pub cursor: usize,
}

/// How to draw it
#[derive(Clone, Copy)]
pub struct RenderOptions<'a> {
    pub view: Viewport,
    /// Device pixels per screen pixel of the target framebuffer
    pub pixel_ratio: f32,
    pub selected_player: Option<PlayerId>,
    pub selected_drawing: Option<DrawingId>,
    /// Shape being drawn, painted translucent
    pub preview: Option<&'a Drawing>,
    pub show_names: bool,
    /// Defensive / midfield / attacking thirds
    pub show_zones: bool,
    /// Playback: hides every editing affordance
    pub anim_mode: bool,
    pub photos: Option<&'a PhotoCache>,
    pub movements: Option<&'a BTreeMap<MovePiece, Vec<Point>>>,
    pub active_piece: Option<MovePiece>,
    pub show_instructions: bool,
    pub editor: Option<EditorOverlay<'a>>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            view: Viewport::Full,
            pixel_ratio: 1.0,
            selected_player: None,
            selected_drawing: None,
            preview: None,
            show_names: true,
            show_zones: false,
            anim_mode: false,
            photos: None,
            movements: None,
            active_piece: None,
            show_instructions: false,
            editor: None,
        }
    }
}

/// Projection used for a framebuffer of this size
pub fn projection_for(fb: &Framebuffer, view: Viewport, pixel_ratio: f32) -> Projection {
    let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    let surface = Surface::new(fb.width as f32 / ratio, fb.height as f32 / ratio, ratio);
    Projection::device(surface, view)
}

/// Paint one full frame. No-op on an empty framebuffer.
pub fn render(fb: &mut Framebuffer, scene: &Scene, opts: &RenderOptions) {
    if fb.is_empty() {
        return;
    }
    let proj = projection_for(fb, opts.view, opts.pixel_ratio);
    if proj.is_degenerate() {
        return;
    }

    fb.clear(palette::SURROUND);
    pitch::draw_pitch(fb, &proj);

    if opts.show_zones {
        overlays::draw_zones(fb, &proj);
    }

    for d in scene.drawings {
        draw_drawing(fb, &proj, d, 1.0);
    }

    if !opts.anim_mode {
        if let Some(preview) = opts.preview {
            draw_drawing(fb, &proj, preview, 0.5);
        }
        if let Some(movements) = opts.movements {
            overlays::draw_movements(fb, &proj, scene, movements, opts.active_piece);
        }
        if let Some(d) = opts.selected_drawing.and_then(|id| scene.drawings.iter().find(|d| d.id == id)) {
            overlays::draw_handles(fb, &proj, d);
        }
    }

    for p in scene.players.iter().filter(|p| p.visible) {
        let selected = !opts.anim_mode && opts.selected_player == Some(p.id);
        let active = !opts.anim_mode && opts.active_piece == Some(MovePiece::Player(p.id));
        let photo = opts.photos.filter(|_| p.photo.is_some()).and_then(|cache| cache.get(p.id));
        pieces::draw_player(fb, &proj, p, selected, active, photo);
    }
    let ball_active = !opts.anim_mode && opts.active_piece == Some(MovePiece::Ball);
    pieces::draw_ball(fb, &proj, scene.ball, ball_active);

    for p in scene.players.iter().filter(|p| p.visible) {
        if opts.show_names {
            if let Some(name) = &p.name {
                pieces::draw_name(fb, &proj, p.pos, name);
            }
        }
        if opts.show_instructions {
            if let Some(text) = &p.instruction {
                overlays::draw_instruction(fb, &proj, p.pos, text);
            }
        }
    }

    if !opts.anim_mode {
        if let Some(editor) = opts.editor {
            overlays::draw_editor(fb, &proj, &editor);
        }
    }
}

/// Pixel width for a logical stroke width, never thinner than one pixel
fn stroke_px(proj: &Projection, logical: f32) -> f32 {
    proj.len(logical).max(1.0)
}

/// Background-colored label box behind text
fn label_box(fb: &mut Framebuffer, min: Point, max: Point, pad: f32, color: Color) {
    let p = Point::new(pad, pad);
    fb.fill_rect(min - p, max + p, color);
}
