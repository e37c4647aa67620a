//! Centralized Action Registry
//!
//! Every board command (undo, tool switches, playback, export, ...) is an
//! [`Action`] with an id, label, optional shortcut and enable/checked
//! conditions. Toolbar buttons and keyboard shortcuts both resolve to the
//! same id, which the app then runs.
//!
//! # Example
//! ```ignore
//! let registry = ActionRegistry::with_actions(board_actions());
//! if let Some(key) = get_last_key_pressed() {
//!     if let Some(id) = registry.lookup(&ctx, key, Modifiers::current()) {
//!         app.run_action(id, now);
//!     }
//! }
//! ```

use macroquad::prelude::*;
use std::collections::HashMap;

use crate::board::{DrawingKind, Tool};

/// A keyboard shortcut (key + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool, // Cmd on Mac
    pub shift: bool,
    pub alt: bool,
}

impl Shortcut {
    pub fn key(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false, alt: false }
    }

    /// Ctrl/Cmd + key
    pub fn ctrl(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: false, alt: false }
    }

    /// Ctrl/Cmd + Shift + key
    pub fn ctrl_shift(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: true, alt: false }
    }

    /// Exact match against a key and modifier state
    pub fn matches(&self, key: KeyCode, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key == key && self.ctrl == ctrl && self.shift == shift && self.alt == alt
    }

    /// Format for display (e.g., "Ctrl+Z", "⌘Z")
    pub fn display(&self) -> String {
        let mut parts = Vec::new();

        #[cfg(target_os = "macos")]
        {
            if self.ctrl {
                parts.push("⌘");
            }
            if self.shift {
                parts.push("⇧");
            }
            if self.alt {
                parts.push("⌥");
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            if self.ctrl {
                parts.push("Ctrl+");
            }
            if self.shift {
                parts.push("Shift+");
            }
            if self.alt {
                parts.push("Alt+");
            }
        }

        parts.push(key_name(self.key));
        parts.join("")
    }
}

/// Modifier keys held this frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn current() -> Self {
        Self {
            ctrl: is_key_down(KeyCode::LeftControl)
                || is_key_down(KeyCode::RightControl)
                || is_key_down(KeyCode::LeftSuper)
                || is_key_down(KeyCode::RightSuper),
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            alt: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        }
    }
}

fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::C => "C",
        KeyCode::E => "E",
        KeyCode::G => "G",
        KeyCode::H => "H",
        KeyCode::L => "L",
        KeyCode::M => "M",
        KeyCode::O => "O",
        KeyCode::R => "R",
        KeyCode::T => "T",
        KeyCode::V => "V",
        KeyCode::X => "X",
        KeyCode::Z => "Z",
        KeyCode::Escape => "Esc",
        KeyCode::Space => "Space",
        KeyCode::Tab => "Tab",
        KeyCode::Delete => "Del",
        KeyCode::F12 => "F12",
        _ => "?",
    }
}

/// Board facts that enable, disable or check actions
#[derive(Debug, Clone, Default)]
pub struct ActionContext {
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_drawing_selection: bool,
    pub has_player_selection: bool,
    pub has_drawings: bool,
    pub has_movements: bool,
    /// An inline editor or the rename field has focus; blocks shortcuts
    pub text_editing: bool,
    pub tool: Option<Tool>,
    pub anim_mode: bool,
    pub playing: bool,
    pub record_armed: bool,
    pub set_piece_mode: bool,
    pub show_zones: bool,
    pub show_names: bool,
    pub pen_filled: bool,
}

type EnableFn = fn(&ActionContext) -> bool;

type CheckedFn = fn(&ActionContext) -> bool;

fn always_enabled(_: &ActionContext) -> bool {
    true
}

#[derive(Clone)]
pub struct Action {
    /// Unique identifier (e.g., "edit.undo", "tool.arrow")
    pub id: &'static str,
    pub label: &'static str,
    pub shortcut: Option<Shortcut>,
    /// Tooltip / status text
    pub status_tip: &'static str,
    enabled_fn: EnableFn,
    checked_fn: Option<CheckedFn>,
    pub category: &'static str,
}

impl Action {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            label: "",
            shortcut: None,
            status_tip: "",
            enabled_fn: always_enabled,
            checked_fn: None,
            category: "General",
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn status_tip(mut self, tip: &'static str) -> Self {
        self.status_tip = tip;
        self
    }

    pub fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    pub fn enabled_when(mut self, f: EnableFn) -> Self {
        self.enabled_fn = f;
        self
    }

    pub fn checked_when(mut self, f: CheckedFn) -> Self {
        self.checked_fn = Some(f);
        self
    }

    pub fn is_enabled(&self, ctx: &ActionContext) -> bool {
        (self.enabled_fn)(ctx)
    }

    pub fn is_checked(&self, ctx: &ActionContext) -> bool {
        self.checked_fn.map_or(false, |f| f(ctx))
    }

    /// Whether a key press fires this action. Shortcuts are blocked while
    /// text is being edited.
    pub fn accepts(&self, ctx: &ActionContext, key: KeyCode, m: Modifiers) -> bool {
        !ctx.text_editing
            && self.is_enabled(ctx)
            && self.shortcut.as_ref().map_or(false, |s| s.matches(key, m.ctrl, m.shift, m.alt))
    }

    /// Tooltip with shortcut hint
    pub fn tooltip(&self) -> String {
        let text = if self.status_tip.is_empty() { self.label } else { self.status_tip };
        match &self.shortcut {
            Some(shortcut) => format!("{} ({})", text, shortcut.display()),
            None => text.to_string(),
        }
    }
}

pub struct ActionRegistry {
    actions: HashMap<&'static str, Action>,
    /// Shortcut to action id, for conflict detection
    shortcut_map: HashMap<Shortcut, &'static str>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self { actions: HashMap::new(), shortcut_map: HashMap::new() }
    }

    pub fn with_actions(actions: Vec<Action>) -> Self {
        let mut registry = Self::new();
        for action in actions {
            registry.register(action);
        }
        registry
    }

    /// Register an action. A shortcut already owned by another action is
    /// dropped from the newcomer.
    pub fn register(&mut self, mut action: Action) {
        if let Some(shortcut) = action.shortcut.clone() {
            if let Some(existing) = self.shortcut_map.get(&shortcut) {
                if *existing != action.id {
                    log::warn!("Shortcut {} of {} already used by {}", shortcut.display(), action.id, existing);
                    action.shortcut = None;
                }
            } else {
                self.shortcut_map.insert(shortcut, action.id);
            }
        }
        self.actions.insert(action.id, action);
    }

    pub fn get(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    pub fn is_enabled(&self, id: &str, ctx: &ActionContext) -> bool {
        self.actions.get(id).map_or(false, |a| a.is_enabled(ctx))
    }

    pub fn is_checked(&self, id: &str, ctx: &ActionContext) -> bool {
        self.actions.get(id).map_or(false, |a| a.is_checked(ctx))
    }

    pub fn label(&self, id: &str) -> &'static str {
        self.actions.get(id).map_or("", |a| a.label)
    }

    pub fn tooltip(&self, id: &str) -> String {
        self.actions.get(id).map_or_else(String::new, |a| a.tooltip())
    }

    /// Action bound to this key press, if any
    pub fn lookup(&self, ctx: &ActionContext, key: KeyCode, m: Modifiers) -> Option<&'static str> {
        self.actions.values().find(|a| a.accepts(ctx, key, m)).map(|a| a.id)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Toolbar order of the drawing tools with their action ids
pub const TOOL_ACTIONS: [(&str, Tool); 11] = [
    ("tool.select", Tool::Select),
    ("tool.eraser", Tool::Eraser),
    ("tool.text", Tool::Text),
    ("tool.line", Tool::Shape(DrawingKind::Line)),
    ("tool.arrow", Tool::Shape(DrawingKind::Arrow)),
    ("tool.run_arrow", Tool::Shape(DrawingKind::RunArrow)),
    ("tool.curved_arrow", Tool::Shape(DrawingKind::CurvedArrow)),
    ("tool.triangle", Tool::Shape(DrawingKind::Triangle)),
    ("tool.rectangle", Tool::Shape(DrawingKind::Rectangle)),
    ("tool.ellipse", Tool::Shape(DrawingKind::Ellipse)),
    ("tool.zone", Tool::Shape(DrawingKind::Zone)),
];

pub fn tool_for_action(id: &str) -> Option<Tool> {
    TOOL_ACTIONS.iter().find(|(a, _)| *a == id).map(|(_, t)| *t)
}

fn tool_action(id: &'static str, label: &'static str, key: KeyCode, checked: CheckedFn) -> Action {
    Action::new(id)
        .label(label)
        .shortcut(Shortcut::key(key))
        .category("Tools")
        .enabled_when(|ctx| !ctx.playing)
        .checked_when(checked)
}

/// Every command the board window offers
pub fn board_actions() -> Vec<Action> {
    vec![
        // Edit
        Action::new("edit.undo")
            .label("Undo")
            .shortcut(Shortcut::ctrl(KeyCode::Z))
            .status_tip("Undo last change")
            .category("Edit")
            .enabled_when(|ctx| ctx.can_undo && !ctx.playing),
        Action::new("edit.redo")
            .label("Redo")
            .shortcut(Shortcut::ctrl_shift(KeyCode::Z))
            .status_tip("Redo last undone change")
            .category("Edit")
            .enabled_when(|ctx| ctx.can_redo && !ctx.playing),
        Action::new("edit.delete")
            .label("Delete")
            .shortcut(Shortcut::key(KeyCode::Delete))
            .status_tip("Delete the selected drawing")
            .category("Edit")
            .enabled_when(|ctx| ctx.has_drawing_selection && !ctx.playing),
        Action::new("edit.escape")
            .label("Deselect")
            .shortcut(Shortcut::key(KeyCode::Escape))
            .status_tip("Clear selection and active piece")
            .category("Edit"),
        Action::new("edit.clear_drawings")
            .label("Clear")
            .status_tip("Remove every drawing")
            .category("Edit")
            .enabled_when(|ctx| ctx.has_drawings && !ctx.playing),
        Action::new("board.reset")
            .label("Reset")
            .status_tip("Players back to the bench, drawings and movements cleared")
            .category("Edit")
            .enabled_when(|ctx| !ctx.playing),
        // Tools
        tool_action("tool.select", "Select", KeyCode::V, |c| c.tool == Some(Tool::Select)),
        tool_action("tool.eraser", "Erase", KeyCode::E, |c| c.tool == Some(Tool::Eraser)),
        tool_action("tool.text", "Text", KeyCode::T, |c| c.tool == Some(Tool::Text)),
        tool_action("tool.line", "Line", KeyCode::L, |c| c.tool == Some(Tool::Shape(DrawingKind::Line))),
        tool_action("tool.arrow", "Pass", KeyCode::A, |c| c.tool == Some(Tool::Shape(DrawingKind::Arrow))),
        tool_action("tool.run_arrow", "Run", KeyCode::R, |c| c.tool == Some(Tool::Shape(DrawingKind::RunArrow))),
        tool_action("tool.curved_arrow", "Curve", KeyCode::C, |c| {
            c.tool == Some(Tool::Shape(DrawingKind::CurvedArrow))
        }),
        tool_action("tool.triangle", "Triangle", KeyCode::G, |c| {
            c.tool == Some(Tool::Shape(DrawingKind::Triangle))
        }),
        tool_action("tool.rectangle", "Rect", KeyCode::M, |c| {
            c.tool == Some(Tool::Shape(DrawingKind::Rectangle))
        }),
        tool_action("tool.ellipse", "Ellipse", KeyCode::O, |c| {
            c.tool == Some(Tool::Shape(DrawingKind::Ellipse))
        }),
        tool_action("tool.zone", "Zone", KeyCode::X, |c| c.tool == Some(Tool::Shape(DrawingKind::Zone))),
        Action::new("pen.fill")
            .label("Fill")
            .status_tip("Fill new closed shapes")
            .category("Tools")
            .checked_when(|ctx| ctx.pen_filled),
        // View
        Action::new("view.cycle")
            .label("View")
            .shortcut(Shortcut::key(KeyCode::Tab))
            .status_tip("Cycle the visible part of the pitch")
            .category("View"),
        Action::new("view.zones")
            .label("Thirds")
            .status_tip("Show defensive, midfield and attacking thirds")
            .category("View")
            .checked_when(|ctx| ctx.show_zones),
        Action::new("view.names")
            .label("Names")
            .status_tip("Show player names")
            .category("View")
            .checked_when(|ctx| ctx.show_names),
        // Players
        Action::new("mode.set_piece")
            .label("Set piece")
            .status_tip("Click a player to write their set-piece instruction")
            .category("Players")
            .enabled_when(|ctx| !ctx.playing && !ctx.anim_mode)
            .checked_when(|ctx| ctx.set_piece_mode),
        Action::new("player.toggle_visible")
            .label("Hide")
            .shortcut(Shortcut::key(KeyCode::H))
            .status_tip("Hide or show the selected player")
            .category("Players")
            .enabled_when(|ctx| ctx.has_player_selection && !ctx.playing),
        Action::new("player.rename")
            .label("Rename")
            .status_tip("Rename the selected player")
            .category("Players")
            .enabled_when(|ctx| ctx.has_player_selection && !ctx.playing),
        Action::new("player.photo")
            .label("Photo")
            .status_tip("Attach a photo to the selected player")
            .category("Players")
            .enabled_when(|ctx| ctx.has_player_selection && !ctx.playing),
        // Animation
        Action::new("anim.mode")
            .label("Animate")
            .status_tip("Author movement paths: click a piece, then click waypoints")
            .category("Animation")
            .enabled_when(|ctx| !ctx.playing)
            .checked_when(|ctx| ctx.anim_mode),
        Action::new("anim.play")
            .label("Play")
            .shortcut(Shortcut::key(KeyCode::Space))
            .status_tip("Play or stop the movement animation")
            .category("Animation")
            .enabled_when(|ctx| ctx.has_movements || ctx.playing)
            .checked_when(|ctx| ctx.playing),
        Action::new("anim.record")
            .label("Rec")
            .status_tip("Record the next playback as a GIF")
            .category("Animation")
            .enabled_when(|ctx| !ctx.playing)
            .checked_when(|ctx| ctx.record_armed),
        Action::new("anim.export")
            .label("Export GIF")
            .status_tip("Render the whole animation straight to a GIF")
            .category("Animation")
            .enabled_when(|ctx| ctx.has_movements && !ctx.playing),
        Action::new("anim.clear")
            .label("Clear paths")
            .status_tip("Remove every movement path")
            .category("Animation")
            .enabled_when(|ctx| ctx.has_movements && !ctx.playing),
        // Export
        Action::new("export.screenshot")
            .label("Snap")
            .shortcut(Shortcut::key(KeyCode::F12))
            .status_tip("Save a PNG screenshot of the board")
            .category("Export"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ActionRegistry {
        ActionRegistry::with_actions(board_actions())
    }

    #[test]
    fn test_shortcut_display() {
        assert!(Shortcut::ctrl(KeyCode::Z).display().contains('Z'));
        assert!(Shortcut::key(KeyCode::Space).display().contains("Space"));
    }

    #[test]
    fn test_no_shortcut_conflicts() {
        let mut seen = std::collections::HashSet::new();
        for action in board_actions() {
            if let Some(s) = action.shortcut {
                assert!(seen.insert(s.clone()), "duplicate shortcut {}", s.display());
            }
        }
        let r = registry();
        assert!(board_actions().iter().all(|a| r.get(a.id).is_some()));
    }

    #[test]
    fn test_undo_needs_history() {
        let r = registry();
        let ctx = ActionContext::default();
        assert!(!r.is_enabled("edit.undo", &ctx));
        let ctx = ActionContext { can_undo: true, ..Default::default() };
        assert!(r.is_enabled("edit.undo", &ctx));
        let ctx = ActionContext { can_undo: true, playing: true, ..Default::default() };
        assert!(!r.is_enabled("edit.undo", &ctx));
    }

    #[test]
    fn test_lookup_respects_modifiers() {
        let r = registry();
        let ctx = ActionContext { can_undo: true, can_redo: true, ..Default::default() };
        let ctrl = Modifiers { ctrl: true, ..Default::default() };
        let ctrl_shift = Modifiers { ctrl: true, shift: true, alt: false };
        assert_eq!(r.lookup(&ctx, KeyCode::Z, ctrl), Some("edit.undo"));
        assert_eq!(r.lookup(&ctx, KeyCode::Z, ctrl_shift), Some("edit.redo"));
        assert_eq!(r.lookup(&ctx, KeyCode::Z, Modifiers::default()), None);
    }

    #[test]
    fn test_text_editing_blocks_shortcuts() {
        let r = registry();
        let ctx = ActionContext { can_undo: true, text_editing: true, ..Default::default() };
        let ctrl = Modifiers { ctrl: true, ..Default::default() };
        assert_eq!(r.lookup(&ctx, KeyCode::Z, ctrl), None);
        assert_eq!(r.lookup(&ctx, KeyCode::Escape, Modifiers::default()), None);
    }

    #[test]
    fn test_tool_actions_checked_by_current_tool() {
        let r = registry();
        let ctx = ActionContext { tool: Some(Tool::Shape(DrawingKind::Zone)), ..Default::default() };
        assert!(r.is_checked("tool.zone", &ctx));
        assert!(!r.is_checked("tool.select", &ctx));
        for (id, tool) in TOOL_ACTIONS {
            assert!(r.get(id).is_some(), "{} not registered", id);
            assert_eq!(tool_for_action(id), Some(tool));
        }
    }

    #[test]
    fn test_duplicate_shortcut_dropped_on_register() {
        let mut r = ActionRegistry::new();
        r.register(Action::new("a").shortcut(Shortcut::key(KeyCode::V)));
        r.register(Action::new("b").shortcut(Shortcut::key(KeyCode::V)));
        assert!(r.get("b").and_then(|a| a.shortcut.as_ref()).is_none());
        assert_eq!(r.lookup(&ActionContext::default(), KeyCode::V, Modifiers::default()), Some("a"));
    }
}
