//! Editing overlays: zone thirds, movement paths, handles, labels and the
//! inline text editor

use std::collections::BTreeMap;

use crate::board::handles::handle_points;
use crate::board::model::TEXT_SCALE;
use crate::board::{Drawing, MovePiece};
use crate::pitch::{self, Point, Projection, PITCH_HEIGHT};
use crate::rasterizer::font;
use crate::rasterizer::{Color, Framebuffer};
use super::{label_box, palette, Scene, PLAYER_RADIUS};

const ZONE_LABELS: [&str; 3] = ["DEFENSIVE", "MIDFIELD", "ATTACKING"];

/// Thirds of the pitch with translucent labels
pub(super) fn draw_zones(fb: &mut Framebuffer, proj: &Projection) {
    let third = pitch::PLAY_LENGTH / 3.0;
    let left = pitch::left_line();
    let tint = Color::rgba(255, 255, 255, 70);
    let dash = proj.len(14.0).max(3.0);
    let gap = proj.len(10.0).max(2.0);

    for i in 1..3 {
        let x = left + third * i as f32;
        let a = proj.to_screen(Point::new(x, pitch::top_line()));
        let b = proj.to_screen(Point::new(x, pitch::bottom_line()));
        fb.draw_dashed_line(a, b, proj.len(2.0).max(1.0), dash, gap, tint);
    }

    let scale = proj.len(3.0).max(1.0);
    for (i, label) in ZONE_LABELS.iter().enumerate() {
        let centre = Point::new(left + third * (i as f32 + 0.5), PITCH_HEIGHT * 0.5);
        fb.draw_text_centered(proj.to_screen(centre), label, scale, tint);
    }
}

/// Dashed path from each piece through its waypoints, with numbered markers
pub(super) fn draw_movements(
    fb: &mut Framebuffer,
    proj: &Projection,
    scene: &Scene,
    movements: &BTreeMap<MovePiece, Vec<Point>>,
    active: Option<MovePiece>,
) {
    let width = proj.len(2.0).max(1.0);
    let dash = proj.len(8.0).max(2.0);
    let gap = proj.len(6.0).max(2.0);
    let marker = proj.len(6.0).max(3.0);
    let text_scale = (marker * 1.4 / font::PX_PER_SCALE).max(0.5);

    for (piece, waypoints) in movements {
        let origin = match piece {
            MovePiece::Ball => Some(scene.ball.pos),
            MovePiece::Player(id) => scene.players.get(id.0).filter(|p| p.visible).map(|p| p.pos),
        };
        let Some(origin) = origin else {
            continue;
        };
        let color = if Some(*piece) == active { palette::ACTIVE_PIECE } else { palette::PATH };

        let mut prev = proj.to_screen(origin);
        for (i, w) in waypoints.iter().enumerate() {
            let s = proj.to_screen(*w);
            fb.draw_dashed_line(prev, s, width, dash, gap, color);
            fb.fill_circle(s, marker, palette::LABEL_BG);
            fb.stroke_circle(s, marker, 1.0, color);
            fb.draw_text_centered(s, &(i + 1).to_string(), text_scale, Color::WHITE);
            prev = s;
        }
    }
}

/// Square handles on the selected drawing
pub(super) fn draw_handles(fb: &mut Framebuffer, proj: &Projection, d: &Drawing) {
    let half = proj.len(4.0).max(3.0);
    let border = 1.0;
    for h in handle_points(d) {
        let s = proj.to_screen(h);
        let r = Point::new(half, half);
        fb.fill_rect(s - r, s + r, palette::HANDLE_BORDER);
        let inner = Point::new(half - border, half - border);
        fb.fill_rect(s - inner, s + inner, palette::HANDLE);
    }
}

/// Set-piece instruction above a player
pub(super) fn draw_instruction(fb: &mut Framebuffer, proj: &Projection, pos: Point, text: &str) {
    let scale = proj.len(1.3).max(0.9);
    let c = proj.to_screen(pos - Point::new(0.0, PLAYER_RADIUS + 12.0));
    let w = font::text_width(text, scale);
    let h = font::text_height(scale);
    let min = Point::new(c.x - w * 0.5, c.y - h * 0.5);
    label_box(fb, min, min + Point::new(w, h), scale * 2.0, Color::rgba(250, 204, 21, 230));
    fb.draw_text(min, text, scale, Color::new(15, 23, 42));
}

/// Text being typed, with a caret at the cursor
pub(super) fn draw_editor(fb: &mut Framebuffer, proj: &Projection, editor: &super::EditorOverlay) {
    let scale = proj.len(TEXT_SCALE).max(1.0);
    let at = proj.to_screen(editor.at);
    let h = font::text_height(scale);
    let w = font::text_width(editor.text, scale).max(font::px_size(scale) * 0.5);
    label_box(fb, at, at + Point::new(w, h), scale * 2.0, palette::LABEL_BG);
    fb.draw_text(at, editor.text, scale, Color::WHITE);

    let before = editor.text.get(..editor.cursor).unwrap_or(editor.text);
    let caret_x = at.x + font::text_width(before, scale) + if before.is_empty() { 0.0 } else { scale * 0.5 };
    fb.draw_line(
        Point::new(caret_x, at.y - scale),
        Point::new(caret_x, at.y + h + scale),
        scale.max(1.0),
        palette::SELECTED,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardState, DrawingId, DrawingKind, Pen};
    use crate::pitch::{Surface, Viewport, PITCH_WIDTH};

    fn setup() -> (Framebuffer, Projection) {
        let mut fb = Framebuffer::new(PITCH_WIDTH as usize, PITCH_HEIGHT as usize);
        fb.clear(Color::BLACK);
        let proj = Projection::new(Surface::new(PITCH_WIDTH, PITCH_HEIGHT, 1.0), Viewport::Full);
        (fb, proj)
    }

    #[test]
    fn test_handles_drawn_at_corners() {
        let (mut fb, proj) = setup();
        let d = Drawing::shape(DrawingId(1), DrawingKind::Rectangle, Point::new(100.0, 100.0), Point::new(200.0, 150.0), Pen::default());
        draw_handles(&mut fb, &proj, &d);
        assert_eq!(fb.pixel(200, 150), palette::HANDLE.to_bytes());
        assert_eq!(fb.pixel(150, 125), Color::BLACK.to_bytes());
    }

    #[test]
    fn test_movement_markers() {
        let (mut fb, proj) = setup();
        let board = BoardState::default();
        let mut movements = BTreeMap::new();
        movements.insert(MovePiece::Ball, vec![Point::new(700.5, 300.5), Point::new(800.5, 300.5)]);
        let scene = Scene { players: &board.players, ball: &board.ball, drawings: &board.drawings };
        draw_movements(&mut fb, &proj, &scene, &movements, None);
        // Marker ring around each waypoint
        assert_ne!(fb.pixel(800, 294), Color::BLACK.to_bytes());
        // Segment between the two waypoints is dashed but present somewhere
        let lit = (710..790).filter(|x| fb.pixel(*x, 300) != Color::BLACK.to_bytes()).count();
        assert!(lit > 0);
    }

    #[test]
    fn test_editor_caret_after_text() {
        let (mut fb, proj) = setup();
        let editor = super::super::EditorOverlay { at: Point::new(100.0, 100.0), text: "AB", cursor: 2 };
        draw_editor(&mut fb, &proj, &editor);
        // Caret sits just right of the text
        let caret_x = 100.0 + font::text_width("AB", TEXT_SCALE) + TEXT_SCALE * 0.5;
        assert_eq!(fb.pixel(caret_x as usize, 105), palette::SELECTED.to_bytes());
    }
}
