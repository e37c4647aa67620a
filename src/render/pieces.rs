//! Players and ball

use crate::board::{Ball, Player, Role, Team};
use crate::photo::PlayerPhoto;
use crate::pitch::{Point, Projection};
use crate::rasterizer::font;
use crate::rasterizer::{Color, Framebuffer};
use super::{label_box, palette, BALL_RADIUS, PLAYER_RADIUS};

fn body_color(team: Team, role: Role) -> Color {
    match (team, role) {
        (Team::Home, Role::Outfield) => palette::HOME,
        (Team::Home, Role::Goalkeeper) => palette::HOME_KEEPER,
        (Team::Away, Role::Outfield) => palette::AWAY,
        (Team::Away, Role::Goalkeeper) => palette::AWAY_KEEPER,
    }
}

/// Text scale that makes a number fill roughly the inner circle
fn number_scale(radius_px: f32) -> f32 {
    (radius_px * 1.1 / font::PX_PER_SCALE).max(0.5)
}

pub(super) fn draw_player(
    fb: &mut Framebuffer,
    proj: &Projection,
    p: &Player,
    selected: bool,
    active_piece: bool,
    photo: Option<&PlayerPhoto>,
) {
    let c = proj.to_screen(p.pos);
    let r = proj.len(PLAYER_RADIUS).max(3.0);
    let ring = proj.len(3.0).max(2.0);

    if active_piece {
        fb.stroke_circle(c, r + ring * 2.0, ring, palette::ACTIVE_PIECE);
    }
    if selected {
        fb.fill_circle(c, r + ring, palette::SELECTED);
    }

    // Drop shadow
    fb.fill_circle(c + Point::new(ring * 0.5, ring * 0.5), r, Color::BLACK.with_alpha(70));
    fb.fill_circle(c, r, body_color(p.team, p.role));

    let number = p.number.to_string();
    match photo {
        Some(photo) => {
            fb.blit_circle(&photo.rgba, photo.size as usize, c, r);
            // Number moves to a small badge so the face stays visible
            let scale = (number_scale(r) * 0.5).max(0.6);
            let badge = c + Point::new(r * 0.7, r * 0.7);
            fb.fill_circle(badge, font::text_height(scale) * 0.8, body_color(p.team, p.role));
            fb.draw_text_centered(badge, &number, scale, Color::WHITE);
        }
        None => {
            let scale = number_scale(r);
            fb.draw_text_centered(c, &number, scale, Color::WHITE);
        }
    }

    fb.stroke_circle(c, r, proj.len(1.5).max(1.0), Color::WHITE);
}

pub(super) fn draw_ball(fb: &mut Framebuffer, proj: &Projection, ball: &Ball, active_piece: bool) {
    let c = proj.to_screen(ball.pos);
    let r = proj.len(BALL_RADIUS).max(2.0);
    if active_piece {
        let ring = proj.len(2.0).max(1.5);
        fb.stroke_circle(c, r + ring * 2.0, ring, palette::ACTIVE_PIECE);
    }
    fb.fill_circle(c + Point::new(r * 0.3, r * 0.3), r, Color::BLACK.with_alpha(80));
    fb.fill_circle(c, r, Color::new(245, 245, 245));
    // Panel in the middle and a thin seam
    fb.fill_circle(c, r * 0.3, Color::new(30, 30, 30));
    fb.stroke_circle(c, r, proj.len(1.0).max(1.0), Color::new(30, 30, 30));
}

/// Name label under a player
pub(super) fn draw_name(fb: &mut Framebuffer, proj: &Projection, pos: Point, name: &str) {
    let scale = proj.len(1.3).max(0.9);
    let c = proj.to_screen(pos + Point::new(0.0, PLAYER_RADIUS + 10.0));
    let w = font::text_width(name, scale);
    let h = font::text_height(scale);
    let min = Point::new(c.x - w * 0.5, c.y - h * 0.5);
    label_box(fb, min, min + Point::new(w, h), scale * 1.5, palette::LABEL_BG);
    fb.draw_text(min, name, scale, Color::WHITE);
}
