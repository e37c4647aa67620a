//! Tactics board: entities, hit-testing, edit handles, formations and the
//! interactive state machine with undo history.
//!
//! # Module Organization
//!
//! - `model` - players, ball, drawings, movements, snapshots
//! - `hit_test` - point queries against players, ball, drawings and handles
//! - `handles` - per-kind handle strategies for reshaping drawings
//! - `history` - bounded undo/redo stack with stage/commit
//! - `formations` - formation templates loaded from RON
//! - `text_entry` - inline text editing used by labels, instructions and names
//! - `state` - `BoardState`, the event-driven state machine

pub mod formations;
pub mod handles;
pub mod history;
pub mod model;
pub mod state;
pub mod text_entry;

pub use formations::{FormationCatalog, FormationError, FormationTemplate};
pub use hit_test::{find_drawing_at_point, find_handle_at_point, find_player_or_ball_at_point, Hit};
pub use model::{
    Ball, BoardSnapshot, Drawing, DrawingId, DrawingKind, MovePiece, Pen, Player, PlayerId, Role, Team,
};
pub use state::{BoardSettings, BoardState, Interaction, KeyInput, Selection, Tool};
pub use text_entry::TextEntry;
