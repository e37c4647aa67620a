//! Text field drawing and keyboard polling for inline editors

use macroquad::prelude::*;

use super::theme::*;
use super::Rect;
use crate::board::{KeyInput, TextEntry};

const INPUT_BG: Color = Color::new(0.12, 0.12, 0.14, 1.0);
const INPUT_CURSOR: Color = Color::new(0.9, 0.9, 0.95, 1.0);

/// Editing keys pressed this frame, in a stable order: navigation and
/// deletion first, then typed characters, then Enter/Escape.
pub fn poll_text_keys() -> Vec<KeyInput> {
    let mut keys = Vec::new();
    for (code, key) in [
        (KeyCode::Left, KeyInput::Left),
        (KeyCode::Right, KeyInput::Right),
        (KeyCode::Home, KeyInput::Home),
        (KeyCode::End, KeyInput::End),
        (KeyCode::Backspace, KeyInput::Backspace),
        (KeyCode::Delete, KeyInput::Delete),
    ] {
        if is_key_pressed(code) {
            keys.push(key);
        }
    }
    while let Some(ch) = get_char_pressed() {
        // Filter control characters
        if ch >= ' ' && ch != '\u{7f}' {
            keys.push(KeyInput::Char(ch));
        }
    }
    if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
        keys.push(KeyInput::Enter);
    }
    if is_key_pressed(KeyCode::Escape) {
        keys.push(KeyInput::Escape);
    }
    keys
}

/// Drop characters typed while no field had focus
pub fn discard_typed_chars() {
    while get_char_pressed().is_some() {}
}

/// Single-line field showing `entry`, with a blinking caret when focused
pub fn draw_text_field(rect: Rect, entry: &TextEntry, focused: bool, time: f64) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, INPUT_BG);
    let border = if focused { ACCENT_COLOR } else { DIVIDER };
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, border);

    let padding = 8.0;
    let text_x = rect.x + padding;
    let text_y = rect.y + (rect.h + FONT_SIZE_CONTENT * 0.7) / 2.0;
    draw_text(&entry.text, text_x, text_y, FONT_SIZE_CONTENT, TEXT_COLOR);

    if focused && (time % 1.0) < 0.5 {
        let before = entry.text.get(..entry.cursor).unwrap_or(&entry.text);
        let offset = measure_text(before, None, FONT_SIZE_CONTENT as u16, 1.0).width;
        let cursor_x = text_x + offset;
        draw_line(cursor_x, rect.y + 6.0, cursor_x, rect.bottom() - 6.0, 1.5, INPUT_CURSOR);
    }
}
