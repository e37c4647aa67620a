//! Input state for UI interaction

use super::Rect;

/// Mouse state for one frame, in screen points
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
}

impl MouseState {
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
#[derive(Debug, Default)]
pub struct UiContext {
    pub mouse: MouseState,
    /// Widget under the mouse this frame
    pub hot: Option<u64>,
    /// Set when a widget took this frame's press; the board then ignores it
    pub consumed_press: bool,
    tooltip: Option<(String, f32, f32)>,
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.hot = None;
        self.consumed_press = false;
        self.tooltip = None;
        self.id_counter = 0;
    }

    pub fn set_hot(&mut self, id: u64) {
        self.hot = Some(id);
    }

    pub fn is_hot(&self, id: u64) -> bool {
        self.hot == Some(id)
    }

    pub fn set_tooltip(&mut self, text: &str, x: f32, y: f32) {
        self.tooltip = Some((text.to_string(), x, y));
    }

    pub fn tooltip(&self) -> Option<(&str, f32, f32)> {
        self.tooltip.as_ref().map(|(t, x, y)| (t.as_str(), *x, *y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_resets_transient_state() {
        let mut ctx = UiContext::new();
        let id = ctx.next_id();
        ctx.set_hot(id);
        ctx.consumed_press = true;
        ctx.set_tooltip("Undo", 1.0, 2.0);

        ctx.begin_frame(MouseState { x: 5.0, y: 5.0, ..Default::default() });
        assert!(!ctx.is_hot(id));
        assert!(!ctx.consumed_press);
        assert!(ctx.tooltip().is_none());
        assert_eq!(ctx.next_id(), 1);
    }

    #[test]
    fn test_clicked_requires_press_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let m = MouseState { x: 5.0, y: 5.0, left_down: true, left_pressed: true, left_released: false };
        assert!(m.clicked(&r));
        let outside = MouseState { x: 15.0, ..m };
        assert!(!outside.clicked(&r));
        let held = MouseState { left_pressed: false, ..m };
        assert!(held.clicking(&r) && !held.clicked(&r));
    }
}
