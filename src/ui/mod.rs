//! Immediate-mode UI for the window chrome
//!
//! Toolbar rows, side panel and status bar are rebuilt every frame from
//! the app state. Widgets report clicks; the app turns them into board
//! commands through the action registry.

mod actions;
mod input;
mod rect;
mod text_field;
pub mod theme;
mod widgets;

pub use actions::*;
pub use input::*;
pub use rect::*;
pub use text_field::*;
pub use widgets::*;
