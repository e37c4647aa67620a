//! Basic UI widgets

use macroquad::prelude::*;

use super::theme::*;
use super::{Rect, UiContext};

/// Left-to-right button row
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
        Self {
            rect,
            cursor_x: rect.x + 4.0,
            spacing: 4.0,
        }
    }

    pub fn separator(&mut self) {
        self.cursor_x += self.spacing * 2.0;
        draw_line(
            self.cursor_x,
            self.rect.y + 4.0,
            self.cursor_x,
            self.rect.bottom() - 4.0,
            1.0,
            DIVIDER,
        );
        self.cursor_x += self.spacing * 2.0;
    }

    pub fn label(&mut self, text: &str) {
        let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
        let text_y = (self.rect.y + (self.rect.h + dims.height) * 0.5).round();
        draw_text(text, self.cursor_x.round(), text_y, FONT_SIZE_CONTENT, TEXT_DIM);
        self.cursor_x += dims.width + self.spacing;
    }

    fn next_rect(&mut self, width: f32) -> Rect {
        let h = (self.rect.h - 4.0).round();
        let r = Rect::new(self.cursor_x.round(), (self.rect.y + 2.0).round(), width.round(), h);
        self.cursor_x += width + self.spacing;
        r
    }

    /// Text button sized to its label
    pub fn button(&mut self, ctx: &mut UiContext, text: &str, tooltip: &str, active: bool, enabled: bool) -> bool {
        let w = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0).width + 16.0;
        let r = self.next_rect(w);
        text_button(ctx, r, text, tooltip, active, enabled)
    }

    /// Square color swatch, outlined when active
    pub fn swatch(&mut self, ctx: &mut UiContext, color: Color, tooltip: &str, active: bool) -> bool {
        let size = self.rect.h - 4.0;
        let r = self.next_rect(size);
        swatch(ctx, r, color, tooltip, active)
    }
}

/// Flat text button. Returns true when clicked while enabled.
pub fn text_button(ctx: &mut UiContext, rect: Rect, text: &str, tooltip: &str, active: bool, enabled: bool) -> bool {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    let pressed = ctx.mouse.clicking(&rect);
    let clicked = ctx.mouse.clicked(&rect);

    if hovered {
        ctx.set_hot(id);
        if !tooltip.is_empty() {
            ctx.set_tooltip(tooltip, ctx.mouse.x, ctx.mouse.y);
        }
    }
    if clicked {
        ctx.consumed_press = true;
    }

    if active {
        draw_rounded_rect(rect, 4.0, ACCENT_COLOR);
    } else if enabled && pressed {
        draw_rounded_rect(rect, 4.0, BUTTON_PRESSED);
    } else if enabled && ctx.is_hot(id) {
        draw_rounded_rect(rect, 4.0, BUTTON_HOVER);
    }

    let color = if !enabled {
        TEXT_DIM
    } else if active {
        WHITE
    } else {
        TEXT_COLOR
    };
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    draw_text(
        text,
        (rect.x + (rect.w - dims.width) * 0.5).round(),
        (rect.y + (rect.h + dims.height) * 0.5).round(),
        FONT_SIZE_CONTENT,
        color,
    );

    clicked && enabled
}

pub fn swatch(ctx: &mut UiContext, rect: Rect, color: Color, tooltip: &str, active: bool) -> bool {
    let id = ctx.next_id();
    let clicked = ctx.mouse.clicked(&rect);
    if ctx.mouse.inside(&rect) {
        ctx.set_hot(id);
        ctx.set_tooltip(tooltip, ctx.mouse.x, ctx.mouse.y);
    }
    if clicked {
        ctx.consumed_press = true;
    }
    let inner = rect.pad(3.0);
    draw_rectangle(inner.x, inner.y, inner.w, inner.h, color);
    if active {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 2.0, ACCENT_COLOR);
    }
    clicked
}

/// Small caption above a panel section
pub fn section_label(rect: Rect, text: &str) {
    draw_text(text, rect.x.round(), (rect.y + FONT_SIZE_HEADER).round(), FONT_SIZE_HEADER, TEXT_COLOR);
}

pub fn draw_tooltip(ctx: &UiContext) {
    let Some((text, x, y)) = ctx.tooltip() else {
        return;
    };
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    let w = dims.width + 12.0;
    let h = FONT_SIZE_CONTENT + 10.0;
    let bx = (x + 12.0).min(screen_width() - w).max(0.0);
    let by = y + 18.0;
    draw_rectangle(bx, by, w, h, HEADER_COLOR);
    draw_rectangle_lines(bx, by, w, h, 1.0, DIVIDER);
    draw_text(text, (bx + 6.0).round(), (by + h - 7.0).round(), FONT_SIZE_CONTENT, TEXT_COLOR);
}

/// Rounded rectangle approximated with overlapping rects and corner circles
fn draw_rounded_rect(rect: Rect, r: f32, color: Color) {
    let Rect { x, y, w, h } = rect;
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}

/// Top-to-bottom layout for the side panel
pub struct Column {
    rect: Rect,
    cursor_y: f32,
    spacing: f32,
}

impl Column {
    pub fn new(rect: Rect) -> Self {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, HEADER_COLOR);
        draw_line(rect.x, rect.y, rect.x, rect.bottom(), 1.0, DIVIDER);
        let inner = rect.pad(10.0);
        Self { rect: inner, cursor_y: inner.y, spacing: 6.0 }
    }

    /// Next full-width slot of `height`; None once the panel is full
    pub fn row(&mut self, height: f32) -> Option<Rect> {
        if self.cursor_y + height > self.rect.bottom() {
            return None;
        }
        let r = Rect::new(self.rect.x, self.cursor_y, self.rect.w, height);
        self.cursor_y += height + self.spacing;
        Some(r)
    }

    /// Next row divided into `n` equal cells
    pub fn cells(&mut self, height: f32, n: usize) -> Vec<Rect> {
        let Some(row) = self.row(height) else {
            return Vec::new();
        };
        let n = n.max(1);
        let gap = 4.0;
        let w = (row.w - gap * (n - 1) as f32) / n as f32;
        (0..n)
            .map(|i| Rect::new(row.x + i as f32 * (w + gap), row.y, w, row.h))
            .collect()
    }

    pub fn heading(&mut self, text: &str) {
        self.cursor_y += self.spacing;
        if let Some(r) = self.row(FONT_SIZE_HEADER + 4.0) {
            section_label(r, text);
            draw_line(r.x, r.bottom(), r.right(), r.bottom(), 1.0, DIVIDER);
        }
    }

    pub fn text(&mut self, text: &str, color: Color) {
        if let Some(r) = self.row(FONT_SIZE_CONTENT + 2.0) {
            draw_text(text, r.x.round(), (r.y + FONT_SIZE_CONTENT).round(), FONT_SIZE_CONTENT, color);
        }
    }

    pub fn button(&mut self, ctx: &mut UiContext, text: &str, tooltip: &str, active: bool, enabled: bool) -> bool {
        match self.row(TOOLBAR_ROW_HEIGHT - 6.0) {
            Some(r) => text_button(ctx, r, text, tooltip, active, enabled),
            None => false,
        }
    }
}
