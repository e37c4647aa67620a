//! Software framebuffer and 2D drawing primitives
//!
//! Everything is drawn in device pixels with straight-alpha blending.
//! Shapes are tested against pixel centers, so edges are hard (no AA),
//! which keeps the output deterministic for screenshots and tests. Text is
//! the exception: glyph coverage from the font is blended as alpha.

use super::font;
use super::math::{ellipse_points, point_in_polygon, point_to_segment_distance, Vec2};
use super::types::Color;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
        }
    }

    /// True if there is nothing to draw into
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Read back a pixel (RGBA). Out of range returns transparent black.
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = (y * self.width + x) * 4;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], self.pixels[idx + 3]]
    }

    /// Blend a color onto a pixel using its alpha
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height || color.a == 0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        if color.a == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
            return;
        }

        // result = front * alpha + back * (1 - alpha)
        let a = color.a as u16;
        let inv_a = 255 - a;
        let mix = |front: u8, back: u8| ((front as u16 * a + back as u16 * inv_a) / 255) as u8;
        self.pixels[idx] = mix(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = mix(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = mix(color.b, self.pixels[idx + 2]);
        let back_a = self.pixels[idx + 3] as u16;
        self.pixels[idx + 3] = (a + back_a * inv_a / 255).min(255) as u8;
    }

    /// Clamp a float pixel range to the framebuffer, returning inclusive integer bounds
    fn clip_box(&self, min: Vec2, max: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = (min.x.floor() as i32).max(0);
        let y0 = (min.y.floor() as i32).max(0);
        let x1 = (max.x.ceil() as i32).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    /// Fill the axis-aligned rectangle spanned by two corners
    pub fn fill_rect(&mut self, a: Vec2, b: Vec2, color: Color) {
        let min = Vec2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Vec2::new(a.x.max(b.x), a.y.max(b.y));
        let Some((x0, y0, x1, y1)) = self.clip_box(min, max) else {
            return;
        };
        for y in y0..=y1 {
            let cy = y as f32 + 0.5;
            if cy < min.y || cy > max.y {
                continue;
            }
            for x in x0..=x1 {
                let cx = x as f32 + 0.5;
                if cx >= min.x && cx <= max.x {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Draw a filled circle
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let r = Vec2::new(radius, radius);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        let r_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.dot(d) <= r_sq {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Draw a circle outline of the given stroke thickness
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        let half = (thickness * 0.5).max(0.5);
        let outer = radius + half;
        let r = Vec2::new(outer, outer);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center).len();
                if (d - radius).abs() <= half {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Stroke a polyline. Each pixel is blended at most once, so translucent
    /// strokes do not darken at the joints.
    pub fn stroke_polyline(&mut self, points: &[Vec2], closed: bool, thickness: f32, color: Color) {
        if points.len() < 2 {
            if let Some(p) = points.first() {
                self.fill_circle(*p, thickness * 0.5, color);
            }
            return;
        }
        let half = (thickness * 0.5).max(0.5);
        let mut min = points[0];
        let mut max = points[0];
        for p in points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let pad = Vec2::new(half, half);
        let Some((x0, y0, x1, y1)) = self.clip_box(min - pad, max + pad) else {
            return;
        };

        let n = points.len();
        let segment_count = if closed { n } else { n - 1 };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let hit = (0..segment_count).any(|i| {
                    point_to_segment_distance(c, points[i], points[(i + 1) % n]) <= half
                });
                if hit {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Draw a straight line of the given thickness
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
        self.stroke_polyline(&[a, b], false, thickness, color);
    }

    /// Draw a dashed line. `dash` and `gap` are lengths in pixels.
    pub fn draw_dashed_line(&mut self, a: Vec2, b: Vec2, thickness: f32, dash: f32, gap: f32, color: Color) {
        let len = a.distance(b);
        if len < 0.001 || dash <= 0.0 {
            return;
        }
        let dir = (b - a) * (1.0 / len);
        let mut t = 0.0;
        while t < len {
            let end = (t + dash).min(len);
            self.draw_line(a + dir * t, a + dir * end, thickness, color);
            t = end + gap.max(0.0);
        }
    }

    /// Fill an arbitrary simple polygon (even-odd rule)
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let mut min = points[0];
        let mut max = points[0];
        for p in points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let Some((x0, y0, x1, y1)) = self.clip_box(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if point_in_polygon(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), points) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Fill an axis-aligned ellipse
    pub fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, color: Color) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let r = Vec2::new(rx, ry);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x as f32 + 0.5 - center.x) / rx;
                let dy = (y as f32 + 0.5 - center.y) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Stroke an axis-aligned ellipse outline
    pub fn stroke_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, thickness: f32, color: Color) {
        let segments = ((rx.max(ry) * 0.75) as usize).clamp(24, 128);
        let pts = ellipse_points(center, rx, ry, segments);
        self.stroke_polyline(&pts, true, thickness, color);
    }

    /// Draw text with the top-left corner of its line box at `pos`.
    /// Glyph coverage is blended as alpha.
    pub fn draw_text(&mut self, pos: Vec2, text: &str, scale: f32, color: Color) {
        if scale <= 0.0 || self.is_empty() {
            return;
        }
        let baseline = (pos.y + font::ascent(scale)).round() as i32;
        let origin_x = pos.x.round() as i32;
        for glyph in font::layout(text, scale) {
            let m = glyph.metrics;
            let left = origin_x + glyph.x.round() as i32 + m.xmin;
            let top = baseline - m.ymin - m.height as i32;
            for (i, &cov) in glyph.coverage.iter().enumerate() {
                if cov == 0 {
                    continue;
                }
                let alpha = (color.a as u16 * cov as u16 / 255) as u8;
                let x = left + (i % m.width) as i32;
                let y = top + (i / m.width) as i32;
                self.blend_pixel(x, y, color.with_alpha(alpha));
            }
        }
    }

    /// Draw text centered on `center`
    pub fn draw_text_centered(&mut self, center: Vec2, text: &str, scale: f32, color: Color) {
        let w = font::text_width(text, scale);
        let h = font::text_height(scale);
        self.draw_text(Vec2::new(center.x - w * 0.5, center.y - h * 0.5), text, scale, color);
    }

    /// Blit a square RGBA image into a circle (nearest-neighbour sampling).
    /// Used for player photos.
    pub fn blit_circle(&mut self, rgba: &[u8], size: usize, center: Vec2, radius: f32) {
        if size == 0 || rgba.len() < size * size * 4 || radius <= 0.0 {
            return;
        }
        let r = Vec2::new(radius, radius);
        let Some((x0, y0, x1, y1)) = self.clip_box(center - r, center + r) else {
            return;
        };
        let r_sq = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.dot(d) > r_sq {
                    continue;
                }
                let u = ((d.x + radius) / (radius * 2.0) * size as f32) as usize;
                let v = ((d.y + radius) / (radius * 2.0) * size as f32) as usize;
                let idx = (v.min(size - 1) * size + u.min(size - 1)) * 4;
                let color = Color::rgba(rgba[idx], rgba[idx + 1], rgba[idx + 2], rgba[idx + 3]);
                self.blend_pixel(x, y, color);
            }
        }
    }
}
