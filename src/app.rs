//! Application state
//!
//! Owns the board, playback, recorder, photo cache and framebuffer, and
//! turns action ids and raw input into board commands. Nothing here talks
//! to the window directly, so the whole flow runs headless in tests; the
//! macroquad loop in `main` only feeds it input and blits the result.

use crate::anim::{AnimationFrame, Playback, Recorder};
use crate::board::{BoardState, Interaction, KeyInput, MovePiece, Pen, PlayerId, Selection, Team, TextEntry};
use crate::config::LabConfig;
use crate::export;
use crate::photo::PhotoCache;
use crate::pitch::{self, Point, Surface, Viewport};
use crate::rasterizer::{Color, Framebuffer};
use crate::render::{self, EditorOverlay, RenderOptions, Scene, PLAYER_RADIUS};
use crate::ui::{board_actions, tool_for_action, ActionContext, ActionRegistry};

/// Seconds a status message stays visible
const STATUS_SECS: f64 = 3.0;
const ERROR_SECS: f64 = 5.0;

/// Work the app cannot do itself and hands back to the window shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRequest {
    /// Open a file dialog and pass the chosen image to [`AppState::load_photo`]
    PickPhoto(PlayerId),
}

#[derive(Debug, Clone)]
struct Status {
    text: String,
    expiry: f64,
    error: bool,
}

pub struct AppState {
    pub config: LabConfig,
    pub board: BoardState,
    pub actions: ActionRegistry,
    pub view: Viewport,
    pub show_names: bool,
    pub show_zones: bool,
    pub photos: PhotoCache,
    pub fb: Framebuffer,
    /// Record the next playback
    pub record_armed: bool,
    playback: Option<Playback>,
    frame: Option<AnimationFrame>,
    recorder: Option<Recorder>,
    rename: Option<(PlayerId, TextEntry)>,
    status: Option<Status>,
    /// Board area of the last render, reused for off-screen export
    last_surface: Surface,
}

impl AppState {
    pub fn new(config: LabConfig) -> Self {
        let board = BoardState::new(config.board_settings());
        Self {
            config,
            board,
            actions: ActionRegistry::with_actions(board_actions()),
            view: Viewport::Full,
            show_names: true,
            show_zones: false,
            photos: PhotoCache::new(),
            fb: Framebuffer::new(0, 0),
            record_armed: false,
            playback: None,
            frame: None,
            recorder: None,
            rename: None,
            status: None,
            last_surface: Surface::new(0.0, 0.0, 1.0),
        }
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    pub fn set_status(&mut self, message: &str, now: f64) {
        self.status = Some(Status { text: message.to_string(), expiry: now + STATUS_SECS, error: false });
    }

    pub fn set_error(&mut self, message: &str, now: f64) {
        log::warn!("{}", message);
        self.status = Some(Status { text: message.to_string(), expiry: now + ERROR_SECS, error: true });
    }

    /// Current message and whether it is an error
    pub fn status(&self, now: f64) -> Option<(&str, bool)> {
        self.status
            .as_ref()
            .filter(|s| now < s.expiry)
            .map(|s| (s.text.as_str(), s.error))
    }

    /// One-line summary of the board mode for the status bar
    pub fn mode_hint(&self) -> String {
        if self.is_playing() {
            let pct = self.frame.as_ref().map_or(0.0, |f| f.progress) * 100.0;
            let rec = if self.recorder.is_some() { " REC" } else { "" };
            return format!("Playing {:.0}%{}", pct, rec);
        }
        match self.board.interaction() {
            Interaction::AuthoringMovement { piece: None } => "Animate: click a player or the ball".into(),
            Interaction::AuthoringMovement { piece: Some(piece) } => {
                let count = self.board.movement(*piece).map_or(0, |m| m.len());
                format!("Animate {}: click to add waypoint {}", self.piece_label(*piece), count + 1)
            }
            Interaction::EditingText { .. } => "Type a label, Enter to place, Esc to cancel".into(),
            Interaction::EditingInstruction { .. } => "Type an instruction, Enter to save".into(),
            _ if self.board.set_piece_mode => "Set piece: click a player".into(),
            _ => format!("{} | {}", self.board.tool.label(), self.view.label()),
        }
    }

    fn piece_label(&self, piece: MovePiece) -> String {
        match piece {
            MovePiece::Ball => "ball".into(),
            MovePiece::Player(id) => match self.board.player(id) {
                Some(p) => format!("{} #{}", p.team.label(), p.number),
                None => "player".into(),
            },
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().map_or(false, |p| p.is_running())
    }

    pub fn is_text_editing(&self) -> bool {
        self.rename.is_some() || self.board.is_editing_text()
    }

    pub fn action_context(&self) -> ActionContext {
        ActionContext {
            can_undo: self.board.can_undo(),
            can_redo: self.board.can_redo(),
            has_drawing_selection: matches!(self.board.selection, Selection::Drawing(_)),
            has_player_selection: self.board.selected_player().is_some(),
            has_drawings: !self.board.drawings.is_empty(),
            has_movements: self.board.movements.values().any(|m| !m.is_empty()),
            text_editing: self.is_text_editing(),
            tool: Some(self.board.tool),
            anim_mode: self.board.animation_mode(),
            playing: self.is_playing(),
            record_armed: self.record_armed,
            set_piece_mode: self.board.set_piece_mode,
            show_zones: self.show_zones,
            show_names: self.show_names,
            pen_filled: self.board.pen.filled,
        }
    }

    /// Run a registered action if it is enabled
    pub fn run_action(&mut self, id: &str, now: f64) -> Option<ShellRequest> {
        let ctx = self.action_context();
        if !self.actions.is_enabled(id, &ctx) {
            return None;
        }
        log::debug!("Action {} ({})", id, self.actions.get(id).map_or("?", |a| a.category));

        if let Some(tool) = tool_for_action(id) {
            self.board.set_tool(tool);
            return None;
        }

        match id {
            "edit.undo" => {
                self.board.key(KeyInput::Undo);
            }
            "edit.redo" => {
                self.board.key(KeyInput::Redo);
            }
            "edit.delete" => {
                self.board.delete_selected();
            }
            "edit.escape" => {
                self.rename = None;
                self.board.key(KeyInput::Escape);
            }
            "edit.clear_drawings" => {
                if self.board.clear_drawings() {
                    self.set_status("Drawings cleared", now);
                }
            }
            "board.reset" => {
                self.rename = None;
                self.board.reset();
                self.set_status("Board reset", now);
            }
            "pen.fill" => {
                let pen = Pen { filled: !self.board.pen.filled, ..self.board.pen };
                self.board.set_pen(pen);
            }
            "view.cycle" => self.cycle_view(),
            "view.zones" => self.show_zones = !self.show_zones,
            "view.names" => self.show_names = !self.show_names,
            "mode.set_piece" => {
                let on = !self.board.set_piece_mode;
                self.board.set_set_piece_mode(on);
            }
            "player.toggle_visible" => {
                if let Some(id) = self.board.selected_player() {
                    let visible = self.board.player(id).map_or(true, |p| p.visible);
                    self.board.set_player_visible(id, !visible);
                }
            }
            "player.rename" => self.begin_rename(),
            "player.photo" => return self.board.selected_player().map(ShellRequest::PickPhoto),
            "anim.mode" => {
                self.board.toggle_animation_mode();
            }
            "anim.play" => {
                if self.is_playing() {
                    self.stop_playback(now);
                } else {
                    self.start_playback(now);
                }
            }
            "anim.record" => self.record_armed = !self.record_armed,
            "anim.export" => self.export_animation(now),
            "anim.clear" => {
                self.board.clear_all_movements();
                self.set_status("Movement paths cleared", now);
            }
            "export.screenshot" => self.screenshot(now),
            other => log::warn!("Unhandled action {}", other),
        }
        None
    }

    pub fn cycle_view(&mut self) {
        let idx = Viewport::ALL.iter().position(|v| *v == self.view).unwrap_or(0);
        self.view = Viewport::ALL[(idx + 1) % Viewport::ALL.len()];
    }

    pub fn set_pen_color(&mut self, color: Color) {
        let pen = Pen { color, ..self.board.pen };
        self.board.set_pen(pen);
    }

    pub fn set_pen_width(&mut self, stroke_width: f32) {
        let pen = Pen { stroke_width, ..self.board.pen };
        self.board.set_pen(pen);
    }

    pub fn apply_formation(&mut self, name: &str, team: Team, now: f64) {
        if self.is_playing() {
            return;
        }
        match self.board.apply_formation(name, team) {
            Ok(()) => self.set_status(&format!("{} set to {}", team.label(), name), now),
            Err(e) => self.set_error(&format!("Formation failed: {}", e), now),
        }
    }

    // ------------------------------------------------------------------
    // Pointer and keyboard
    // ------------------------------------------------------------------

    /// Logical pitch point for a position relative to the board surface
    pub fn to_logical(&self, x: f32, y: f32, surface: Surface) -> Point {
        pitch::to_logical(x, y, surface, self.view)
    }

    pub fn pointer_down(&mut self, p: Point) {
        if self.is_playing() {
            return;
        }
        self.commit_rename();
        self.board.pointer_down(p);
    }

    pub fn pointer_move(&mut self, p: Point) {
        if !self.is_playing() {
            self.board.pointer_move(p);
        }
    }

    pub fn pointer_up(&mut self, p: Point) {
        if !self.is_playing() {
            self.board.pointer_up(p);
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.board.pointer_cancel();
    }

    /// Editing keys go to the rename field when open, else to the board
    pub fn text_key(&mut self, key: KeyInput) {
        if self.rename.is_some() {
            match key {
                KeyInput::Enter => self.commit_rename(),
                KeyInput::Escape => self.rename = None,
                other => {
                    if let Some((_, entry)) = &mut self.rename {
                        entry.apply(other);
                    }
                }
            }
            return;
        }
        self.board.key(key);
    }

    // ------------------------------------------------------------------
    // Player panel
    // ------------------------------------------------------------------

    pub fn begin_rename(&mut self) {
        let Some(id) = self.board.selected_player() else {
            return;
        };
        let name = self.board.player(id).and_then(|p| p.name.clone()).unwrap_or_default();
        self.rename = Some((id, TextEntry::new(name)));
    }

    pub fn rename_field(&self) -> Option<(PlayerId, &TextEntry)> {
        self.rename.as_ref().map(|(id, e)| (*id, e))
    }

    pub fn commit_rename(&mut self) {
        if let Some((id, entry)) = self.rename.take() {
            self.board.rename_player(id, &entry.text);
        }
    }

    /// Decode an uploaded image for `id`. `label` is what the player record
    /// keeps (usually the file name).
    pub fn load_photo(&mut self, id: PlayerId, bytes: &[u8], label: &str, now: f64) {
        match self.photos.load(id, bytes) {
            Ok(()) => {
                self.board.set_player_photo(id, Some(label.to_string()));
                self.set_status(&format!("Photo set: {}", label), now);
            }
            Err(e) => self.set_error(&format!("Photo not loaded: {}", e), now),
        }
    }

    // ------------------------------------------------------------------
    // Playback and recording
    // ------------------------------------------------------------------

    pub fn start_playback(&mut self, now: f64) {
        self.board.commit_editor();
        self.board.pointer_cancel();
        let Some(playback) = Playback::new(
            &self.board.movements,
            &self.board.players,
            &self.board.ball,
            self.config.leg_duration,
        ) else {
            self.set_status("No movements to play", now);
            return;
        };

        if self.record_armed {
            self.recorder = Recorder::try_new(self.config.recording_fps);
            if self.recorder.is_none() {
                self.set_status("Recording not available here, playing only", now);
            }
        }
        log::info!("Playback started: {} legs, {:.1}s", playback.max_legs(), playback.total_duration());
        self.playback = Some(playback);
        self.frame = None;
    }

    /// Halt playback now. Whatever was recorded so far is still saved.
    pub fn stop_playback(&mut self, now: f64) {
        if let Some(pb) = &mut self.playback {
            log::info!("Playback stopped at {:.0}%", pb.progress() * 100.0);
            pb.stop();
        }
        self.finish_playback(now);
    }

    /// Advance playback to `now`. Returns whether it is still running.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(pb) = &mut self.playback else {
            return false;
        };
        match pb.tick(now) {
            Some(frame) => {
                self.frame = Some(frame);
                true
            }
            None => {
                self.finish_playback(now);
                false
            }
        }
    }

    fn finish_playback(&mut self, now: f64) {
        self.playback = None;
        self.frame = None;
        self.record_armed = false;
        if let Some(recorder) = self.recorder.take() {
            self.save_recording(recorder, now);
        }
    }

    fn save_recording(&mut self, recorder: Recorder, now: f64) {
        let frames = recorder.frame_count();
        let saved = recorder
            .finish()
            .and_then(|gif| export::save_recording(&gif, &self.config.export_dir));
        match saved {
            Ok(path) => self.set_status(&format!("Recording saved to {} ({} frames)", path.display(), frames), now),
            Err(e) => self.set_error(&format!("Recording not saved: {}", e), now),
        }
    }

    /// Render the whole animation off-screen at the recording rate and save
    /// it as a GIF, without waiting for real-time playback
    pub fn export_animation(&mut self, now: f64) {
        self.board.commit_editor();
        self.board.pointer_cancel();
        let Some(mut playback) = Playback::new(
            &self.board.movements,
            &self.board.players,
            &self.board.ball,
            self.config.leg_duration,
        ) else {
            self.set_status("No movements to export", now);
            return;
        };
        let Some(mut recorder) = Recorder::try_new(self.config.recording_fps) else {
            self.set_status("Recording not available here", now);
            return;
        };

        let surface = self.last_surface;
        let step = 1.0 / recorder.fps() as f64;
        let mut clock = 0.0;
        let rendered = playback.run(step, |frame| {
            self.frame = Some(frame.clone());
            self.render(surface);
            recorder.capture(&self.fb, clock);
            clock += step;
            true
        });
        self.frame = None;
        log::info!("Exported {} frames over {} legs", rendered, playback.max_legs());
        self.save_recording(recorder, now);
    }

    /// Store the rendered frame if a recording is running
    pub fn capture(&mut self, now: f64) {
        if let Some(rec) = &mut self.recorder {
            rec.capture(&self.fb, now);
        }
    }

    // ------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------

    /// Render the board into `self.fb` for a surface of this size
    pub fn render(&mut self, surface: Surface) {
        self.last_surface = surface;
        let ratio = self.config.pixel_ratio_override.unwrap_or(surface.pixel_ratio);
        let surface = Surface::new(surface.width, surface.height, ratio);
        let (w, h) = surface.device_size();
        self.fb.resize(w, h);

        let moved_players;
        let moved_ball;
        let scene = match &self.frame {
            Some(frame) => {
                moved_players = frame.apply(&self.board.players);
                moved_ball = frame.ball();
                Scene { players: &moved_players, ball: &moved_ball, drawings: &self.board.drawings }
            }
            None => Scene { players: &self.board.players, ball: &self.board.ball, drawings: &self.board.drawings },
        };

        let preview = self.board.preview();
        let editor = match self.board.interaction() {
            Interaction::EditingText { at, entry } => {
                Some(EditorOverlay { at: *at, text: &entry.text, cursor: entry.cursor })
            }
            Interaction::EditingInstruction { player, entry } => self.board.player(*player).map(|p| EditorOverlay {
                at: p.pos - Point::new(0.0, PLAYER_RADIUS * 2.0 + 16.0),
                text: &entry.text,
                cursor: entry.cursor,
            }),
            _ => None,
        };

        let opts = RenderOptions {
            view: self.view,
            pixel_ratio: ratio,
            selected_player: self.board.selected_player(),
            selected_drawing: self.board.selected_drawing().map(|d| d.id),
            preview: preview.as_ref(),
            show_names: self.show_names,
            show_zones: self.show_zones,
            anim_mode: self.frame.is_some(),
            photos: Some(&self.photos),
            movements: self.board.animation_mode().then_some(&self.board.movements),
            active_piece: self.board.active_move_piece(),
            show_instructions: self.board.set_piece_mode,
            editor,
        };
        render::render(&mut self.fb, &scene, &opts);
    }

    pub fn screenshot(&mut self, now: f64) {
        match export::save_screenshot(&self.fb, &self.config.export_dir) {
            Ok(path) => self.set_status(&format!("Screenshot saved to {}", path.display()), now),
            Err(e) => self.set_error(&format!("Screenshot failed: {}", e), now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DrawingKind, Tool};
    use crate::pitch::{PITCH_HEIGHT, PITCH_WIDTH};

    fn app_in(dir: &std::path::Path) -> AppState {
        let config = LabConfig { export_dir: dir.to_path_buf(), leg_duration: 0.2, ..Default::default() };
        AppState::new(config)
    }

    fn surface() -> Surface {
        Surface::new(PITCH_WIDTH / 2.0, PITCH_HEIGHT / 2.0, 1.0)
    }

    #[test]
    fn test_tool_actions_switch_tool() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.run_action("tool.zone", 0.0);
        assert_eq!(app.board.tool, Tool::Shape(DrawingKind::Zone));
        app.run_action("tool.select", 0.0);
        assert_eq!(app.board.tool, Tool::Select);
    }

    #[test]
    fn test_draw_then_undo_via_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.run_action("tool.arrow", 0.0);
        app.pointer_down(Point::new(100.0, 100.0));
        app.pointer_move(Point::new(200.0, 150.0));
        app.pointer_up(Point::new(200.0, 150.0));
        assert_eq!(app.board.drawings.len(), 1);
        assert!(app.action_context().can_undo);

        app.run_action("edit.undo", 0.0);
        assert!(app.board.drawings.is_empty());
        app.run_action("edit.redo", 0.0);
        assert_eq!(app.board.drawings.len(), 1);
    }

    #[test]
    fn test_disabled_action_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(app.run_action("player.photo", 0.0).is_none());
        app.board.selection = Selection::Player(PlayerId(3));
        assert_eq!(app.run_action("player.photo", 0.0), Some(ShellRequest::PickPhoto(PlayerId(3))));
    }

    #[test]
    fn test_status_expires() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.set_status("Hello", 10.0);
        assert_eq!(app.status(11.0), Some(("Hello", false)));
        assert!(app.status(10.0 + STATUS_SECS + 0.1).is_none());
    }

    #[test]
    fn test_view_cycles_through_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        for _ in 0..Viewport::ALL.len() {
            app.run_action("view.cycle", 0.0);
        }
        assert_eq!(app.view, Viewport::Full);
        app.run_action("view.cycle", 0.0);
        assert_eq!(app.view, Viewport::ALL[1]);
    }

    #[test]
    fn test_rename_field_commits_on_enter() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.board.selection = Selection::Player(PlayerId(0));
        app.run_action("player.rename", 0.0);
        assert!(app.is_text_editing());
        for c in "Kim".chars() {
            app.text_key(KeyInput::Char(c));
        }
        app.text_key(KeyInput::Enter);
        assert!(!app.is_text_editing());
        assert_eq!(app.board.players[0].name.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_play_without_movements_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.start_playback(0.0);
        assert!(!app.is_playing());
        assert_eq!(app.status(0.5).map(|s| s.0), Some("No movements to play"));
    }

    #[test]
    fn test_playback_moves_pieces_without_touching_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.board.movements.insert(MovePiece::Ball, vec![Point::new(100.0, 100.0)]);
        let start = app.board.ball.pos;

        app.run_action("anim.play", 0.0);
        assert!(app.is_playing());
        // Board edits are blocked while playing
        app.pointer_down(Point::new(300.0, 300.0));
        assert_eq!(app.board.selection, Selection::None);

        let mut t = 0.0;
        while app.tick(t) {
            app.render(surface());
            t += 0.05;
        }
        assert!(!app.is_playing());
        assert_eq!(app.board.ball.pos, start);
    }

    #[test]
    fn test_recorded_playback_writes_gif() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.board.movements.insert(MovePiece::Player(PlayerId(5)), vec![Point::new(500.0, 300.0)]);
        app.run_action("anim.record", 0.0);
        assert!(app.record_armed);
        app.run_action("anim.play", 0.0);

        let mut t = 0.0;
        while app.tick(t) {
            app.render(surface());
            app.capture(t);
            t += 0.1;
        }
        assert!(!app.record_armed);
        let gif = dir.path().join("coach-lab-1.gif");
        assert!(gif.is_file(), "{:?}", app.status(t));
    }

    #[test]
    fn test_export_animation_renders_offscreen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.board.movements.insert(MovePiece::Ball, vec![Point::new(100.0, 100.0), Point::new(200.0, 150.0)]);
        let start = app.board.ball.pos;
        app.render(surface());

        app.run_action("anim.export", 0.0);
        assert!(!app.is_playing());
        assert_eq!(app.board.ball.pos, start);

        let bytes = std::fs::read(dir.path().join("coach-lab-1.gif")).unwrap();
        let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
        let frames = image::AnimationDecoder::into_frames(decoder).collect_frames().unwrap();
        // Two legs of 0.2s at 15 fps
        assert!(frames.len() >= 5, "{} frames", frames.len());
        let (message, error) = app.status(0.1).unwrap();
        assert!(!error);
        assert!(message.contains(&format!("({} frames)", frames.len())), "{message}");
    }

    #[test]
    fn test_stop_midway_still_saves_recording() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.config.leg_duration = 10.0;
        app.board.movements.insert(MovePiece::Ball, vec![Point::new(100.0, 100.0)]);
        app.record_armed = true;
        app.start_playback(0.0);
        for i in 0..3 {
            let t = i as f64 * 0.2;
            app.tick(t);
            app.render(surface());
            app.capture(t);
        }
        app.run_action("anim.play", 1.0);
        assert!(!app.is_playing());
        assert!(dir.path().join("coach-lab-1.gif").is_file());
    }

    #[test]
    fn test_screenshot_after_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.render(surface());
        app.run_action("export.screenshot", 0.0);
        let png = dir.path().join("coach-lab-1.png");
        let img = image::open(&png).unwrap();
        assert_eq!(img.width() as usize, app.fb.width);
    }

    #[test]
    fn test_pixel_ratio_override_scales_framebuffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.config.pixel_ratio_override = Some(2.0);
        app.render(Surface::new(400.0, 300.0, 1.0));
        assert_eq!((app.fb.width, app.fb.height), (800, 600));
    }

    #[test]
    fn test_unknown_formation_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.apply_formation("2-2-6", Team::Home, 0.0);
        assert_eq!(app.status(0.1).map(|s| s.1), Some(true));
        app.apply_formation("1-4-4-2", Team::Away, 1.0);
        assert_eq!(app.status(1.1).map(|s| s.1), Some(false));
    }
}
