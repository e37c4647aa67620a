//! Board label font
//!
//! Glyphs are rasterized with fontdue from an embedded TTF so names and
//! labels keep their accents and case. Sizes are given as a text scale;
//! one unit of scale is `PX_PER_SCALE` pixels of font size.

use std::sync::OnceLock;

use fontdue::{Font, FontSettings, Metrics};

const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansCondensed-Bold.ttf");

/// Font size in pixels for a text scale of 1.0
pub const PX_PER_SCALE: f32 = 9.0;

static FONT: OnceLock<Option<Font>> = OnceLock::new();

fn font() -> Option<&'static Font> {
    FONT.get_or_init(|| match Font::from_bytes(FONT_BYTES, FontSettings::default()) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Label font failed to load, board text disabled: {}", e);
            None
        }
    })
    .as_ref()
}

pub fn px_size(scale: f32) -> f32 {
    scale.max(0.0) * PX_PER_SCALE
}

/// Distance from the top of a line to its baseline
pub fn ascent(scale: f32) -> f32 {
    let px = px_size(scale);
    font()
        .and_then(|f| f.horizontal_line_metrics(px))
        .map(|m| m.ascent)
        .unwrap_or(px)
}

/// Height of one line of text in output pixels at the given scale
pub fn text_height(scale: f32) -> f32 {
    let px = px_size(scale);
    font()
        .and_then(|f| f.horizontal_line_metrics(px))
        .map(|m| m.ascent - m.descent)
        .unwrap_or(px)
}

/// Width of `text` in output pixels at the given scale, kerning included
pub fn text_width(text: &str, scale: f32) -> f32 {
    let Some(font) = font() else {
        return 0.0;
    };
    let px = px_size(scale);
    let mut width = 0.0;
    let mut prev = None;
    for c in text.chars() {
        if let Some(p) = prev {
            width += font.horizontal_kern(p, c, px).unwrap_or(0.0);
        }
        width += font.metrics(c, px).advance_width;
        prev = Some(c);
    }
    width
}

/// One glyph placed on a line: pen offset from the line origin plus its coverage bitmap
pub struct PlacedGlyph {
    pub x: f32,
    pub metrics: Metrics,
    pub coverage: Vec<u8>,
}

/// Rasterize every glyph of `text`, advancing the pen with kerning
pub fn layout(text: &str, scale: f32) -> Vec<PlacedGlyph> {
    let Some(font) = font() else {
        return Vec::new();
    };
    let px = px_size(scale);
    if px <= 0.0 {
        return Vec::new();
    }
    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen_x = 0.0;
    let mut prev = None;
    for c in text.chars() {
        if let Some(p) = prev {
            pen_x += font.horizontal_kern(p, c, px).unwrap_or(0.0);
        }
        let (metrics, coverage) = font.rasterize(c, px);
        glyphs.push(PlacedGlyph { x: pen_x, metrics, coverage });
        pen_x += metrics.advance_width;
        prev = Some(c);
    }
    glyphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(c: char) -> Vec<u8> {
        layout(&c.to_string(), 2.0).remove(0).coverage
    }

    #[test]
    fn test_accented_letters_have_their_own_glyphs() {
        for c in ['ü', 'é', 'ã', 'ß', 'Ø'] {
            assert_ne!(font().unwrap().lookup_glyph_index(c), 0, "{c} missing from font");
            assert_ne!(coverage(c), coverage('?'), "{c} drawn as '?'");
        }
    }

    #[test]
    fn test_case_is_kept() {
        assert_ne!(coverage('a'), coverage('A'));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2.0), 0.0);
        let one = text_width("1", 1.0);
        assert!(one > 0.0);
        assert!(text_width("10", 2.0) > one * 2.0);
        assert!(text_width("Müller", 2.0) > text_width("Mul", 2.0));
    }

    #[test]
    fn test_line_height_scales() {
        assert!(text_height(1.0) >= PX_PER_SCALE);
        assert!((text_height(2.0) - text_height(1.0) * 2.0).abs() < 1.0);
        assert!(ascent(2.0) < text_height(2.0));
    }
}
