//! Board state machine
//!
//! `BoardState` is the single owner of players, ball, drawings and
//! movement paths. Pointer and keyboard events arrive already translated
//! into logical pitch coordinates; transient gesture state lives in one
//! [`Interaction`] value so illegal combinations (drawing a shape while
//! typing an instruction, etc.) cannot be represented.

use std::collections::BTreeMap;

use crate::pitch::{clamp_to_pitch, Point};
use super::formations::{FormationCatalog, FormationError};
use super::handles::apply_handle_drag;
use super::hit_test::{find_drawing_at_point, find_handle_at_point, find_player_or_ball_at_point, Hit};
use super::history::{History, DEFAULT_HISTORY_LIMIT};
use super::model::{
    canonical_players, Ball, BoardSnapshot, Drawing, DrawingId, DrawingKind, MovePiece, Pen, Player, PlayerId,
    Team,
};
use super::text_entry::TextEntry;

/// Active tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Eraser,
    Text,
    Shape(DrawingKind),
}

impl Tool {
    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Eraser => "Eraser",
            Tool::Text => "Text",
            Tool::Shape(kind) => kind.label(),
        }
    }
}

/// What is currently selected. A player and a drawing are never both selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Player(PlayerId),
    Drawing(DrawingId),
}

/// Transient gesture state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving a player or the ball; `offset` keeps the grabbed point under the cursor
    Dragging { target: Hit, offset: Point, moved: bool },
    /// Live preview of a shape being drawn
    DrawingShape { kind: DrawingKind, start: Point, current: Point },
    /// Reshaping the selected drawing through one of its handles
    EditingHandle { drawing: DrawingId, handle: usize, moved: bool },
    /// Text tool entry at `at`
    EditingText { at: Point, entry: TextEntry },
    /// Set-piece instruction for a player
    EditingInstruction { player: PlayerId, entry: TextEntry },
    /// Animation authoring; clicks append waypoints to `piece`
    AuthoringMovement { piece: Option<MovePiece> },
}

/// Keyboard input understood by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Undo,
    Redo,
    Escape,
    Delete,
    Enter,
    Backspace,
    Left,
    Right,
    Home,
    End,
    Char(char),
}

/// Distances in logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    /// Shapes shorter than this are discarded as clicks
    pub min_drag_distance: f32,
    /// Pick radius for players and the ball
    pub hit_radius: f32,
    /// Pick radius for drawing handles
    pub handle_radius: f32,
    /// Max distance from a drawing's outline that still hits it
    pub drawing_tolerance: f32,
    pub history_limit: usize,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            min_drag_distance: 5.0,
            hit_radius: 14.0,
            handle_radius: 10.0,
            drawing_tolerance: 8.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl From<Hit> for MovePiece {
    fn from(hit: Hit) -> Self {
        match hit {
            Hit::Player(id) => MovePiece::Player(id),
            Hit::Ball => MovePiece::Ball,
        }
    }
}

pub struct BoardState {
    pub players: Vec<Player>,
    pub ball: Ball,
    pub drawings: Vec<Drawing>,
    /// Waypoints per piece. Not part of undo snapshots.
    pub movements: BTreeMap<MovePiece, Vec<Point>>,
    pub tool: Tool,
    pub pen: Pen,
    pub selection: Selection,
    pub set_piece_mode: bool,
    interaction: Interaction,
    history: History,
    settings: BoardSettings,
    formations: FormationCatalog,
    next_drawing_id: u32,
}

impl BoardState {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            players: canonical_players(),
            ball: Ball::default(),
            drawings: Vec::new(),
            movements: BTreeMap::new(),
            tool: Tool::Select,
            pen: Pen::default(),
            selection: Selection::None,
            set_piece_mode: false,
            interaction: Interaction::Idle,
            history: History::new(settings.history_limit),
            settings,
            formations: FormationCatalog::builtin(),
            next_drawing_id: 1,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn formations(&self) -> &FormationCatalog {
        &self.formations
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            players: self.players.clone(),
            ball: self.ball,
            drawings: self.drawings.clone(),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id == id)
    }

    pub fn selected_player(&self) -> Option<PlayerId> {
        match self.selection {
            Selection::Player(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_drawing(&self) -> Option<&Drawing> {
        match self.selection {
            Selection::Drawing(id) => self.drawing(id),
            _ => None,
        }
    }

    /// Current position of a movable piece
    pub fn piece_position(&self, piece: MovePiece) -> Option<Point> {
        match piece {
            MovePiece::Ball => Some(self.ball.pos),
            MovePiece::Player(id) => self.player(id).map(|p| p.pos),
        }
    }

    /// True while an inline editor owns the keyboard
    pub fn is_editing_text(&self) -> bool {
        matches!(
            self.interaction,
            Interaction::EditingText { .. } | Interaction::EditingInstruction { .. }
        )
    }

    pub fn animation_mode(&self) -> bool {
        matches!(self.interaction, Interaction::AuthoringMovement { .. })
    }

    pub fn active_move_piece(&self) -> Option<MovePiece> {
        match self.interaction {
            Interaction::AuthoringMovement { piece } => piece,
            _ => None,
        }
    }

    /// The shape being drawn, if any
    pub fn preview(&self) -> Option<Drawing> {
        match self.interaction {
            Interaction::DrawingShape { kind, start, current } => Some(Drawing::shape(
                DrawingId(self.next_drawing_id),
                kind,
                start,
                current,
                self.pen,
            )),
            _ => None,
        }
    }

    pub fn movement(&self, piece: MovePiece) -> Option<&[Point]> {
        self.movements.get(&piece).map(|w| w.as_slice())
    }

    // ------------------------------------------------------------------
    // Pointer events (logical coordinates)
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, p: Point) {
        let p = clamp_to_pitch(p);

        // Clicking anywhere blurs an open editor, which commits it
        self.commit_editor();

        if let Interaction::AuthoringMovement { piece } = self.interaction {
            self.author_click(piece, p);
            return;
        }

        match self.tool {
            Tool::Select => self.select_down(p),
            Tool::Eraser => {
                self.erase_at(p);
            }
            Tool::Text => {
                self.selection = Selection::None;
                self.interaction = Interaction::EditingText { at: p, entry: TextEntry::default() };
            }
            Tool::Shape(kind) => {
                self.interaction = Interaction::DrawingShape { kind, start: p, current: p };
            }
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        let p = clamp_to_pitch(p);
        match self.interaction {
            Interaction::Dragging { target, offset, .. } => {
                let to = clamp_to_pitch(p + offset);
                if self.set_hit_position(target, to) {
                    if let Interaction::Dragging { moved, .. } = &mut self.interaction {
                        *moved = true;
                    }
                }
            }
            Interaction::DrawingShape { ref mut current, .. } => *current = p,
            Interaction::EditingHandle { drawing, handle, .. } => {
                if let Some(d) = self.drawings.iter_mut().find(|d| d.id == drawing) {
                    let before = d.clone();
                    apply_handle_drag(d, handle, p);
                    if *d != before {
                        if let Interaction::EditingHandle { moved, .. } = &mut self.interaction {
                            *moved = true;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, p: Point) {
        self.pointer_move(p);

        match std::mem::take(&mut self.interaction) {
            Interaction::Dragging { moved, .. } | Interaction::EditingHandle { moved, .. } => {
                if moved {
                    self.history.commit();
                } else {
                    self.history.take_staged();
                }
            }
            Interaction::DrawingShape { kind, start, current } => {
                if start.distance(current) > self.settings.min_drag_distance {
                    self.checkpoint();
                    let id = self.alloc_drawing_id();
                    self.drawings.push(Drawing::shape(id, kind, start, current, self.pen));
                    log::debug!("Created {:?} drawing {:?}", kind, id);
                }
            }
            other => self.interaction = other,
        }
    }

    /// Pointer capture lost: revert an unfinished drag or handle edit
    pub fn pointer_cancel(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Dragging { .. } | Interaction::EditingHandle { .. } => {
                if let Some(before) = self.history.take_staged() {
                    self.restore(before);
                }
            }
            Interaction::DrawingShape { .. } => {}
            other => self.interaction = other,
        }
    }

    fn select_down(&mut self, p: Point) {
        // Handles of the selected drawing sit on top of everything else
        if let Some(d) = self.selected_drawing() {
            if let Some(handle) = find_handle_at_point(d, p, self.settings.handle_radius) {
                let drawing = d.id;
                let snap = self.snapshot();
                self.history.stage(snap);
                self.interaction = Interaction::EditingHandle { drawing, handle, moved: false };
                return;
            }
        }

        if let Some(hit) = find_player_or_ball_at_point(&self.players, &self.ball, p, self.settings.hit_radius) {
            match hit {
                Hit::Player(id) => {
                    self.selection = Selection::Player(id);
                    if self.set_piece_mode {
                        let current = self.player(id).and_then(|pl| pl.instruction.clone()).unwrap_or_default();
                        self.interaction = Interaction::EditingInstruction { player: id, entry: TextEntry::new(current) };
                        return;
                    }
                }
                Hit::Ball => self.selection = Selection::None,
            }
            if let Some(pos) = self.hit_position(hit) {
                let snap = self.snapshot();
                self.history.stage(snap);
                self.interaction = Interaction::Dragging { target: hit, offset: pos - p, moved: false };
            }
            return;
        }

        self.selection = match find_drawing_at_point(&self.drawings, p, self.settings.drawing_tolerance) {
            Some(id) => Selection::Drawing(id),
            None => Selection::None,
        };
    }

    fn author_click(&mut self, piece: Option<MovePiece>, p: Point) {
        match piece {
            Some(piece) => {
                let path = self.movements.entry(piece).or_default();
                path.push(p);
                log::debug!("{:?}: waypoint {} at ({:.0}, {:.0})", piece, path.len(), p.x, p.y);
            }
            None => {
                if let Some(hit) = find_player_or_ball_at_point(&self.players, &self.ball, p, self.settings.hit_radius) {
                    self.interaction = Interaction::AuthoringMovement { piece: Some(hit.into()) };
                }
            }
        }
    }

    /// Remove the topmost drawing under `p`
    pub fn erase_at(&mut self, p: Point) -> bool {
        let Some(id) = find_drawing_at_point(&self.drawings, p, self.settings.drawing_tolerance) else {
            return false;
        };
        self.remove_drawing(id)
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Returns true if the key was consumed
    pub fn key(&mut self, key: KeyInput) -> bool {
        if self.is_editing_text() {
            return match key {
                KeyInput::Enter => {
                    self.commit_editor();
                    true
                }
                KeyInput::Escape => {
                    self.interaction = Interaction::Idle;
                    true
                }
                other => match &mut self.interaction {
                    Interaction::EditingText { entry, .. } | Interaction::EditingInstruction { entry, .. } => {
                        entry.apply(other)
                    }
                    _ => false,
                },
            };
        }

        match key {
            KeyInput::Undo => self.undo(),
            KeyInput::Redo => self.redo(),
            KeyInput::Escape => {
                self.escape();
                true
            }
            KeyInput::Delete | KeyInput::Backspace => self.delete_selected(),
            _ => false,
        }
    }

    /// Clear the selection and the active move piece
    pub fn escape(&mut self) {
        self.selection = Selection::None;
        match &mut self.interaction {
            Interaction::AuthoringMovement { piece } => *piece = None,
            Interaction::DrawingShape { .. } => self.interaction = Interaction::Idle,
            _ => {}
        }
    }

    /// Finish the open inline editor, storing its text
    pub fn commit_editor(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::EditingText { at, entry } => {
                if let Some(text) = entry.value() {
                    self.checkpoint();
                    let id = self.alloc_drawing_id();
                    self.drawings.push(Drawing::label(id, at, &text, self.pen));
                }
            }
            Interaction::EditingInstruction { player, entry } => {
                let value = entry.value();
                let changed = self.player(player).is_some_and(|p| p.instruction != value);
                if changed {
                    self.checkpoint();
                    if let Some(p) = self.players.get_mut(player.0) {
                        p.instruction = value;
                    }
                }
            }
            other => self.interaction = other,
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn checkpoint(&mut self) {
        let snap = self.snapshot();
        self.history.checkpoint(snap);
    }

    /// Replace players, ball and drawings. Movements and tool state stay.
    fn restore(&mut self, snap: BoardSnapshot) {
        self.players = snap.players;
        self.ball = snap.ball;
        self.drawings = snap.drawings;
        if let Selection::Drawing(id) = self.selection {
            if self.drawing(id).is_none() {
                self.selection = Selection::None;
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        self.pointer_cancel();
        let current = self.snapshot();
        let Some(prev) = self.history.undo(current) else {
            return false;
        };
        self.restore(prev);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.pointer_cancel();
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        true
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.commit_editor();
        self.pointer_cancel();
        self.tool = tool;
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn set_set_piece_mode(&mut self, on: bool) {
        if !on && matches!(self.interaction, Interaction::EditingInstruction { .. }) {
            self.interaction = Interaction::Idle;
        }
        self.set_piece_mode = on;
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Selection::Drawing(id) => self.remove_drawing(id),
            _ => false,
        }
    }

    fn remove_drawing(&mut self, id: DrawingId) -> bool {
        let Some(idx) = self.drawings.iter().position(|d| d.id == id) else {
            return false;
        };
        self.checkpoint();
        self.drawings.remove(idx);
        if self.selection == Selection::Drawing(id) {
            self.selection = Selection::None;
        }
        true
    }

    pub fn clear_drawings(&mut self) -> bool {
        if self.drawings.is_empty() {
            return false;
        }
        self.checkpoint();
        self.drawings.clear();
        if matches!(self.selection, Selection::Drawing(_)) {
            self.selection = Selection::None;
        }
        true
    }

    /// Canonical layout, no drawings, no movements
    pub fn reset(&mut self) {
        self.pointer_cancel();
        self.checkpoint();
        self.players = canonical_players();
        self.ball = Ball::default();
        self.drawings.clear();
        self.movements.clear();
        self.selection = Selection::None;
        self.interaction = Interaction::Idle;
        log::info!("Board reset");
    }

    /// Empty names clear the name
    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> bool {
        let trimmed = name.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        match self.player(id) {
            Some(p) if p.name != value => {}
            _ => return false,
        }
        self.checkpoint();
        if let Some(p) = self.players.get_mut(id.0) {
            p.name = value;
        }
        true
    }

    pub fn set_player_visible(&mut self, id: PlayerId, visible: bool) -> bool {
        match self.player(id) {
            Some(p) if p.visible != visible => {}
            _ => return false,
        }
        self.checkpoint();
        if let Some(p) = self.players.get_mut(id.0) {
            p.visible = visible;
        }
        if !visible && self.selection == Selection::Player(id) {
            self.selection = Selection::None;
        }
        true
    }

    pub fn set_player_photo(&mut self, id: PlayerId, photo: Option<String>) -> bool {
        match self.player(id) {
            Some(p) if p.photo != photo => {}
            _ => return false,
        }
        self.checkpoint();
        if let Some(p) = self.players.get_mut(id.0) {
            p.photo = photo;
        }
        true
    }

    /// Move every player of `team` to the named template. One undo step.
    pub fn apply_formation(&mut self, name: &str, team: Team) -> Result<(), FormationError> {
        let template = self.formations.get(name)?.clone();
        self.pointer_cancel();
        self.checkpoint();
        for p in self.players.iter_mut().filter(|p| p.team == team) {
            if let Some(pos) = template.position(p.number, team) {
                p.pos = pos;
            }
        }
        log::info!("Applied {} to {}", name, team.label());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Movement authoring
    // ------------------------------------------------------------------

    /// Enter or leave authoring mode. Returns the new mode.
    pub fn toggle_animation_mode(&mut self) -> bool {
        self.commit_editor();
        self.pointer_cancel();
        if self.animation_mode() {
            self.interaction = Interaction::Idle;
            false
        } else {
            self.interaction = Interaction::AuthoringMovement { piece: None };
            true
        }
    }

    /// Choose which piece receives waypoints (enters authoring mode)
    pub fn select_move_piece(&mut self, piece: Option<MovePiece>) {
        if let Some(MovePiece::Player(id)) = piece {
            if self.player(id).is_none() {
                return;
            }
        }
        if !self.animation_mode() {
            self.commit_editor();
            self.pointer_cancel();
        }
        self.interaction = Interaction::AuthoringMovement { piece };
    }

    pub fn clear_movement(&mut self, piece: MovePiece) -> bool {
        self.movements.remove(&piece).is_some()
    }

    pub fn clear_all_movements(&mut self) {
        self.movements.clear();
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn alloc_drawing_id(&mut self) -> DrawingId {
        let id = DrawingId(self.next_drawing_id);
        self.next_drawing_id += 1;
        id
    }

    fn hit_position(&self, hit: Hit) -> Option<Point> {
        self.piece_position(hit.into())
    }

    /// Returns true if the position changed
    fn set_hit_position(&mut self, hit: Hit, to: Point) -> bool {
        let slot = match hit {
            Hit::Ball => &mut self.ball.pos,
            Hit::Player(id) => match self.players.get_mut(id.0) {
                Some(p) => &mut p.pos,
                None => return false,
            },
        };
        if *slot == to {
            return false;
        }
        *slot = to;
        true
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(BoardSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::hit_test::find_drawing_at_point;
    use crate::pitch::{self, to_logical, Surface, Viewport, PITCH_HEIGHT, PITCH_WIDTH};
    use proptest::prelude::*;

    fn drag(board: &mut BoardState, from: Point, to: Point) {
        board.pointer_down(from);
        board.pointer_move(from.lerp(to, 0.5));
        board.pointer_up(to);
    }

    fn draw(board: &mut BoardState, kind: DrawingKind, from: Point, to: Point) {
        board.set_tool(Tool::Shape(kind));
        drag(board, from, to);
    }

    fn type_text(board: &mut BoardState, text: &str) {
        for c in text.chars() {
            board.key(KeyInput::Char(c));
        }
    }

    #[test]
    fn test_drag_player_keeps_grab_offset() {
        let mut board = BoardState::default();
        let start = board.players[3].pos;
        let grab = start + Point::new(4.0, 3.0);
        drag(&mut board, grab, Point::new(404.0, 303.0));
        assert_eq!(board.players[3].pos, Point::new(400.0, 300.0));
        assert_eq!(board.selection, Selection::Player(PlayerId(3)));
        assert!(board.can_undo());
    }

    #[test]
    fn test_player_on_top_of_zone_is_grabbed_first() {
        let mut board = BoardState::default();
        let pos = pitch::center() - Point::new(200.0, 0.0);
        let from = board.players[6].pos;
        drag(&mut board, from, pos);
        draw(&mut board, DrawingKind::Zone, pos - Point::new(60.0, 60.0), pos + Point::new(60.0, 60.0));
        let zone = board.drawings[0].clone();
        board.set_tool(Tool::Select);

        drag(&mut board, pos, pos + Point::new(20.0, 10.0));
        assert_eq!(board.selection, Selection::Player(PlayerId(6)));
        assert_eq!(board.players[6].pos, pos + Point::new(20.0, 10.0));
        assert_eq!(board.drawings[0], zone);

        // Inside the zone but away from any piece selects the zone
        board.pointer_down(pos - Point::new(45.0, 45.0));
        board.pointer_up(pos - Point::new(45.0, 45.0));
        assert_eq!(board.selection, Selection::Drawing(zone.id));
    }

    #[test]
    fn test_click_without_moving_records_nothing() {
        let mut board = BoardState::default();
        let pos = board.players[0].pos;
        board.pointer_down(pos);
        board.pointer_up(pos);
        assert!(!board.can_undo());
    }

    #[test]
    fn test_undo_restores_exactly_one_step() {
        let mut board = BoardState::default();
        draw(&mut board, DrawingKind::Arrow, Point::new(200.0, 200.0), Point::new(300.0, 250.0));
        board.set_tool(Tool::Select);
        let s0 = board.snapshot();

        board.toggle_animation_mode();
        board.select_move_piece(Some(MovePiece::Ball));
        board.pointer_down(Point::new(600.0, 300.0));
        board.toggle_animation_mode();

        let ball = board.ball.pos;
        drag(&mut board, ball, Point::new(700.0, 400.0));
        assert_ne!(board.snapshot(), s0);

        assert!(board.undo());
        assert_eq!(board.snapshot(), s0);
        // Movements and tool state are untouched
        assert_eq!(board.movement(MovePiece::Ball).map(|w| w.len()), Some(1));
        assert_eq!(board.tool, Tool::Select);

        assert!(board.redo());
        assert_eq!(board.ball.pos, Point::new(700.0, 400.0));
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut board = BoardState::default();
        let before = board.snapshot();
        assert!(!board.key(KeyInput::Undo));
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_shape_commit_threshold() {
        let mut board = BoardState::default();
        let p = Point::new(300.0, 300.0);
        draw(&mut board, DrawingKind::Rectangle, p, p);
        assert!(board.drawings.is_empty());
        draw(&mut board, DrawingKind::Rectangle, p, p + Point::new(3.0, 3.0));
        assert!(board.drawings.is_empty());
        draw(&mut board, DrawingKind::Rectangle, p, p + Point::new(30.0, 20.0));
        assert_eq!(board.drawings.len(), 1);
        assert!(board.preview().is_none());
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut board = BoardState::default();
        board.set_tool(Tool::Shape(DrawingKind::Line));
        board.pointer_down(Point::new(100.0, 100.0));
        board.pointer_move(Point::new(150.0, 120.0));
        let preview = board.preview().unwrap();
        assert_eq!((preview.start, preview.end), (Point::new(100.0, 100.0), Point::new(150.0, 120.0)));
        board.pointer_cancel();
        assert!(board.preview().is_none());
        assert!(board.drawings.is_empty());
    }

    #[test]
    fn test_drawn_line_is_hit_testable() {
        let mut board = BoardState::default();
        draw(&mut board, DrawingKind::Line, Point::new(100.0, 100.0), Point::new(100.0, 300.0));
        let id = board.drawings[0].id;
        assert_eq!(find_drawing_at_point(&board.drawings, Point::new(100.0, 200.0), 10.0), Some(id));
        assert_eq!(find_drawing_at_point(&board.drawings, Point::new(300.0, 200.0), 10.0), None);
    }

    #[test]
    fn test_eraser_removes_top_hit_and_is_undoable() {
        let mut board = BoardState::default();
        draw(&mut board, DrawingKind::Line, Point::new(100.0, 400.0), Point::new(300.0, 400.0));
        draw(&mut board, DrawingKind::Line, Point::new(200.0, 300.0), Point::new(200.0, 500.0));
        let top = board.drawings[1].id;
        board.set_tool(Tool::Eraser);
        board.pointer_down(Point::new(200.0, 400.0));
        board.pointer_up(Point::new(200.0, 400.0));
        assert_eq!(board.drawings.len(), 1);
        assert!(board.drawing(top).is_none());
        board.undo();
        assert_eq!(board.drawings.len(), 2);
    }

    #[test]
    fn test_select_drawing_then_delete() {
        let mut board = BoardState::default();
        draw(&mut board, DrawingKind::Line, Point::new(600.0, 500.0), Point::new(800.0, 500.0));
        board.set_tool(Tool::Select);
        board.pointer_down(Point::new(700.0, 502.0));
        board.pointer_up(Point::new(700.0, 502.0));
        assert!(matches!(board.selection, Selection::Drawing(_)));
        assert!(board.key(KeyInput::Delete));
        assert!(board.drawings.is_empty());
        assert_eq!(board.selection, Selection::None);
    }

    #[test]
    fn test_handle_edit_is_one_history_step() {
        let mut board = BoardState::default();
        draw(&mut board, DrawingKind::Rectangle, Point::new(600.0, 400.0), Point::new(700.0, 500.0));
        board.set_tool(Tool::Select);
        board.pointer_down(Point::new(650.0, 400.0));
        board.pointer_up(Point::new(650.0, 400.0));
        let id = board.drawings[0].id;
        assert_eq!(board.selection, Selection::Drawing(id));
        let before = board.snapshot();

        // Grab the bottom-right corner, drag it in several steps
        board.pointer_down(Point::new(700.0, 500.0));
        for i in 1..=5 {
            board.pointer_move(Point::new(700.0 + i as f32 * 10.0, 500.0 + i as f32 * 5.0));
        }
        board.pointer_up(Point::new(750.0, 525.0));
        assert_eq!(board.drawing(id).unwrap().bounds(), (Point::new(600.0, 400.0), Point::new(750.0, 525.0)));

        board.undo();
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_text_tool_commit_and_cancel() {
        let mut board = BoardState::default();
        board.set_tool(Tool::Text);
        board.pointer_down(Point::new(300.0, 300.0));
        assert!(board.is_editing_text());
        type_text(&mut board, "Press");
        // Undo is gated while typing
        assert!(!board.key(KeyInput::Undo));
        board.key(KeyInput::Enter);
        assert_eq!(board.drawings.len(), 1);
        assert_eq!(board.drawings[0].text.as_deref(), Some("Press"));

        board.pointer_down(Point::new(400.0, 300.0));
        type_text(&mut board, "Drop");
        board.key(KeyInput::Escape);
        assert_eq!(board.drawings.len(), 1);

        // Blank text is not created
        board.pointer_down(Point::new(400.0, 300.0));
        type_text(&mut board, "   ");
        board.key(KeyInput::Enter);
        assert_eq!(board.drawings.len(), 1);
    }

    #[test]
    fn test_clicking_elsewhere_commits_text() {
        let mut board = BoardState::default();
        board.set_tool(Tool::Text);
        board.pointer_down(Point::new(300.0, 300.0));
        type_text(&mut board, "A");
        board.pointer_down(Point::new(500.0, 300.0));
        assert_eq!(board.drawings.len(), 1);
        assert!(board.is_editing_text());
    }

    #[test]
    fn test_set_piece_instruction() {
        let mut board = BoardState::default();
        board.set_set_piece_mode(true);
        let pos = board.players[5].pos;
        board.pointer_down(pos);
        assert!(board.is_editing_text());
        type_text(&mut board, "near post");
        board.key(KeyInput::Enter);
        assert_eq!(board.players[5].instruction.as_deref(), Some("near post"));
        // Player did not move
        assert_eq!(board.players[5].pos, pos);

        board.pointer_down(pos);
        type_text(&mut board, " run");
        board.key(KeyInput::Escape);
        assert_eq!(board.players[5].instruction.as_deref(), Some("near post"));

        board.undo();
        assert_eq!(board.players[5].instruction, None);
    }

    #[test]
    fn test_movement_authoring_scenario() {
        let mut board = BoardState::default();
        assert!(board.toggle_animation_mode());
        // Click the player to make it the active piece, then add a waypoint
        let pos = board.players[7].pos;
        board.pointer_down(pos);
        assert_eq!(board.active_move_piece(), Some(MovePiece::Player(PlayerId(7))));
        board.pointer_down(Point::new(300.0, 300.0));

        board.select_move_piece(Some(MovePiece::Ball));
        let clicks = [Point::new(600.0, 300.0), Point::new(650.0, 200.0), Point::new(800.0, 340.0)];
        for c in clicks {
            board.pointer_down(c);
            board.pointer_up(c);
        }
        assert_eq!(board.movement(MovePiece::Ball), Some(&clicks[..]));

        assert!(board.clear_movement(MovePiece::Ball));
        assert!(board.movement(MovePiece::Ball).is_none());
        assert_eq!(board.movement(MovePiece::Player(PlayerId(7))).map(|w| w.len()), Some(1));
        // Authoring does not touch the board
        assert!(!board.can_undo());
    }

    #[test]
    fn test_escape_clears_selection_and_move_piece() {
        let mut board = BoardState::default();
        board.select_move_piece(Some(MovePiece::Ball));
        board.selection = Selection::Player(PlayerId(1));
        board.key(KeyInput::Escape);
        assert_eq!(board.selection, Selection::None);
        assert!(board.animation_mode());
        assert_eq!(board.active_move_piece(), None);
    }

    #[test]
    fn test_formation_scenario() {
        let mut board = BoardState::default();
        board.apply_formation("1-4-3-3", Team::Home).unwrap();
        let template = board.formations().get("1-4-3-3").unwrap().clone();
        for p in board.players.iter().filter(|p| p.team == Team::Home) {
            let (nx, ny) = template.slots[(p.number - 1) as usize];
            let expected = Point::new(
                pitch::left_line() + nx * pitch::PLAY_LENGTH,
                pitch::top_line() + ny * pitch::PLAY_WIDTH,
            );
            assert!(p.pos.distance(expected) < 0.001, "#{}", p.number);
        }
        let gk = board.players.iter().find(|p| p.team == Team::Home && p.number == 1).unwrap();
        assert_eq!(gk.role, crate::board::model::Role::Goalkeeper);
        // Away team untouched
        let fresh = canonical_players();
        for (p, q) in board.players.iter().zip(fresh.iter()).filter(|(p, _)| p.team == Team::Away) {
            assert_eq!(p.pos, q.pos);
        }
    }

    #[test]
    fn test_formation_determinism_and_mirror() {
        let mut a = BoardState::default();
        let mut b = BoardState::default();
        for p in b.players.iter_mut() {
            p.pos = Point::new(123.0, 456.0);
        }
        a.apply_formation("1-4-2-3-1", Team::Home).unwrap();
        b.apply_formation("1-4-2-3-1", Team::Home).unwrap();
        b.apply_formation("1-4-2-3-1", Team::Away).unwrap();
        for n in 1..=11u8 {
            let home_a = a.players.iter().find(|p| p.team == Team::Home && p.number == n).unwrap().pos;
            let home_b = b.players.iter().find(|p| p.team == Team::Home && p.number == n).unwrap().pos;
            let away_b = b.players.iter().find(|p| p.team == Team::Away && p.number == n).unwrap().pos;
            assert_eq!(home_a, home_b);
            assert!((home_b.x + away_b.x - PITCH_WIDTH).abs() < 0.01);
            assert_eq!(home_b.y, away_b.y);
        }
    }

    #[test]
    fn test_unknown_formation_leaves_board() {
        let mut board = BoardState::default();
        let before = board.snapshot();
        assert!(matches!(board.apply_formation("W-M", Team::Home), Err(FormationError::Unknown(_))));
        assert_eq!(board.snapshot(), before);
        assert!(!board.can_undo());
    }

    #[test]
    fn test_hidden_player_cannot_be_grabbed() {
        let mut board = BoardState::default();
        let pos = board.players[2].pos;
        assert!(board.set_player_visible(PlayerId(2), false));
        board.pointer_down(pos);
        board.pointer_up(pos + Point::new(50.0, 50.0));
        assert_eq!(board.players[2].pos, pos);
    }

    #[test]
    fn test_rename_and_reset() {
        let mut board = BoardState::default();
        assert!(board.rename_player(PlayerId(9), "  Salah "));
        assert_eq!(board.players[9].name.as_deref(), Some("Salah"));
        assert!(!board.rename_player(PlayerId(9), "Salah"));
        assert!(board.rename_player(PlayerId(9), ""));
        assert_eq!(board.players[9].name, None);
        assert!(!board.rename_player(PlayerId(99), "nobody"));

        draw(&mut board, DrawingKind::Zone, Point::new(100.0, 100.0), Point::new(200.0, 200.0));
        board.select_move_piece(Some(MovePiece::Ball));
        board.pointer_down(Point::new(10.0, 10.0));
        board.reset();
        assert!(board.drawings.is_empty());
        assert!(board.movements.is_empty());
        assert_eq!(board.players, canonical_players());
        assert!(!board.animation_mode());
    }

    proptest! {
        #[test]
        fn prop_dragged_positions_stay_on_pitch(
            sx in -3000.0f32..3000.0,
            sy in -3000.0f32..3000.0,
            ball in proptest::bool::ANY,
        ) {
            let mut board = BoardState::default();
            let surface = Surface::new(800.0, 600.0, 2.0);
            let target = to_logical(sx, sy, surface, Viewport::HalfLeft);
            let from = if ball { board.ball.pos } else { board.players[4].pos };
            drag(&mut board, from, target);
            let pos = if ball { board.ball.pos } else { board.players[4].pos };
            prop_assert!(pos.x >= 0.0 && pos.x <= PITCH_WIDTH);
            prop_assert!(pos.y >= 0.0 && pos.y <= PITCH_HEIGHT);
        }
    }
}
