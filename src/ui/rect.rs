//! Rectangle type for UI layout

/// A rectangle defined by position and size, in screen points
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Strip of `height` along the top edge
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.clamp(0.0, self.h))
    }

    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.clamp(0.0, self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    pub fn slice_bottom(&self, height: f32) -> Self {
        let h = height.clamp(0.0, self.h);
        Self::new(self.x, self.bottom() - h, self.w, h)
    }

    pub fn remaining_after_bottom(&self, height: f32) -> Self {
        let h = height.clamp(0.0, self.h);
        Self::new(self.x, self.y, self.w, self.h - h)
    }

    /// Column of `width` along the right edge
    pub fn slice_right(&self, width: f32) -> Self {
        let w = width.clamp(0.0, self.w);
        Self::new(self.right() - w, self.y, w, self.h)
    }

    pub fn remaining_after_right(&self, width: f32) -> Self {
        let w = width.clamp(0.0, self.w);
        Self::new(self.x, self.y, self.w - w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(50.0, 40.0));
        assert!(!r.contains(110.0, 40.0));
        assert!(!r.contains(50.0, 70.0));
    }

    #[test]
    fn test_slices_partition() {
        let r = Rect::screen(800.0, 600.0);
        let top = r.slice_top(72.0);
        let rest = r.remaining_after_top(72.0);
        assert_eq!(top.h + rest.h, 600.0);
        assert_eq!(rest.y, 72.0);

        let side = rest.slice_right(220.0);
        let board = rest.remaining_after_right(220.0);
        assert_eq!(side.x, 580.0);
        assert_eq!(board.w, 580.0);

        let status = board.slice_bottom(24.0);
        assert_eq!(status.bottom(), 600.0);
        assert_eq!(board.remaining_after_bottom(24.0).h, rest.h - 24.0);
    }

    #[test]
    fn test_oversized_slice_clamps() {
        let r = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(r.slice_top(80.0).h, 50.0);
        assert_eq!(r.remaining_after_top(80.0).h, 0.0);
        assert_eq!(r.pad(40.0).w, 0.0);
    }
}
