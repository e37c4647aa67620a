//! Inline text entry with a cursor
//!
//! Backs the text tool, set-piece instructions and player renaming. It holds
//! no platform input code; the window shell feeds it [`KeyInput`]s.

use super::state::KeyInput;

/// Longest text accepted by an inline editor (characters)
pub const MAX_ENTRY_CHARS: usize = 48;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEntry {
    pub text: String,
    /// Cursor position (byte index)
    pub cursor: usize,
}

impl TextEntry {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    /// Trimmed contents, None when blank
    pub fn value(&self) -> Option<String> {
        let t = self.text.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch.is_control() || self.text.chars().count() >= MAX_ENTRY_CHARS {
            return;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete character after cursor
    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Apply an editing key. Returns false for keys an editor does not own
    /// (Enter/Escape are handled by whoever owns the entry).
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => self.insert_char(c),
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => self.move_left(),
            KeyInput::Right => self.move_right(),
            KeyInput::Home => self.move_home(),
            KeyInput::End => self.move_end(),
            _ => return false,
        }
        true
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }
}
