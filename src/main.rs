//! Coach Lab: a tactical drawing board for football coaches
//!
//! Place both teams and the ball on a pitch, draw passes, runs and zones,
//! author movement paths and play them back (optionally recorded to GIF).
//! The board is rendered in software into a framebuffer that is blitted to
//! the window every frame.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod anim;
mod app;
mod board;
mod config;
mod export;
mod photo;
mod pitch;
mod rasterizer;
mod render;
mod ui;

use macroquad::prelude::*;

use app::{AppState, ShellRequest};
use board::{Selection, Team};
use config::LabConfig;
use pitch::{Point, Surface};
use rasterizer::Framebuffer;
use ui::theme::{self, to_mq};
use ui::{
    discard_typed_chars, draw_text_field, draw_tooltip, poll_text_keys, Column, Modifiers, MouseState, Rect,
    Toolbar, UiContext, TOOL_ACTIONS,
};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Coach Lab v{}", VERSION),
        window_width: 1440,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Screen regions for one frame
struct Layout {
    tools: Rect,
    commands: Rect,
    side: Rect,
    board: Rect,
    status: Rect,
}

impl Layout {
    fn compute(width: f32, height: f32) -> Self {
        let screen = Rect::screen(width, height);
        let tools = screen.slice_top(theme::TOOLBAR_ROW_HEIGHT);
        let rest = screen.remaining_after_top(theme::TOOLBAR_ROW_HEIGHT);
        let commands = rest.slice_top(theme::TOOLBAR_ROW_HEIGHT);
        let rest = rest.remaining_after_top(theme::TOOLBAR_ROW_HEIGHT);
        let status = rest.slice_bottom(theme::STATUS_BAR_HEIGHT);
        let rest = rest.remaining_after_bottom(theme::STATUS_BAR_HEIGHT);
        let side = rest.slice_right(theme::SIDE_PANEL_WIDTH);
        let board = rest.remaining_after_right(theme::SIDE_PANEL_WIDTH);
        Self { tools, commands, side, board, status }
    }
}

fn poll_mouse() -> MouseState {
    let (x, y) = mouse_position();
    MouseState {
        x,
        y,
        left_down: is_mouse_button_down(MouseButton::Left),
        left_pressed: is_mouse_button_pressed(MouseButton::Left),
        left_released: is_mouse_button_released(MouseButton::Left),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging first, before anything else can panic
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Coach Lab v{}", VERSION);

    let config = LabConfig::load_or_default();
    let mut app = AppState::new(config);
    let mut ctx = UiContext::new();
    // A press that started on the board owns the pointer until release
    let mut board_press = false;
    let mut last_point: Option<Point> = None;

    loop {
        let now = get_time();
        clear_background(theme::BG_COLOR);

        let mouse = poll_mouse();
        ctx.begin_frame(mouse);
        let layout = Layout::compute(screen_width(), screen_height());
        let mut requests = Vec::new();

        draw_tool_row(&mut ctx, &mut app, layout.tools, now, &mut requests);
        draw_command_row(&mut ctx, &mut app, layout.commands, now, &mut requests);
        draw_side_panel(&mut ctx, &mut app, layout.side, now, &mut requests);

        // Keyboard: editors own typing, everything else goes through shortcuts
        if app.is_text_editing() {
            for key in poll_text_keys() {
                app.text_key(key);
            }
        } else {
            discard_typed_chars();
            if let Some(key) = get_last_key_pressed() {
                let actx = app.action_context();
                if let Some(id) = app.actions.lookup(&actx, key, Modifiers::current()) {
                    requests.extend(app.run_action(id, now));
                }
            }
        }

        // Pointer on the board
        let surface = Surface::new(layout.board.w, layout.board.h, screen_dpi_scale());
        let p = app.to_logical(mouse.x - layout.board.x, mouse.y - layout.board.y, surface);
        if mouse.left_pressed && mouse.inside(&layout.board) && !ctx.consumed_press {
            board_press = true;
            last_point = Some(p);
            app.pointer_down(p);
        } else if board_press && mouse.left_down && last_point != Some(p) {
            last_point = Some(p);
            app.pointer_move(p);
        }
        if board_press && mouse.left_released {
            board_press = false;
            last_point = None;
            app.pointer_up(p);
        }
        if board_press && is_mouse_button_pressed(MouseButton::Right) {
            board_press = false;
            last_point = None;
            app.pointer_cancel();
        }

        for request in requests {
            handle_request(&mut app, request, now);
        }

        app.tick(now);
        app.render(surface);
        app.capture(now);
        blit(&app.fb, layout.board);

        draw_status_bar(&app, layout.status, now);
        draw_tooltip(&ctx);

        next_frame().await;
    }
}

/// Draw the software framebuffer into `rect`
fn blit(fb: &Framebuffer, rect: Rect) {
    if fb.is_empty() {
        return;
    }
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Linear);
    draw_texture_ex(
        &texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(rect.w, rect.h)),
            ..Default::default()
        },
    );
}

/// Toolbar button bound to a registered action
fn action_button(
    tb: &mut Toolbar,
    ctx: &mut UiContext,
    app: &mut AppState,
    id: &'static str,
    label: Option<&str>,
    now: f64,
    requests: &mut Vec<ShellRequest>,
) {
    let actx = app.action_context();
    let text = label.unwrap_or_else(|| app.actions.label(id));
    let tip = app.actions.tooltip(id);
    let enabled = app.actions.is_enabled(id, &actx);
    let checked = app.actions.is_checked(id, &actx);
    if tb.button(ctx, text, &tip, checked, enabled) {
        requests.extend(app.run_action(id, now));
    }
}

fn draw_tool_row(ctx: &mut UiContext, app: &mut AppState, rect: Rect, now: f64, requests: &mut Vec<ShellRequest>) {
    let mut tb = Toolbar::new(rect);
    for (id, _) in TOOL_ACTIONS {
        action_button(&mut tb, ctx, app, id, None, now, requests);
    }

    tb.separator();
    action_button(&mut tb, ctx, app, "pen.fill", None, now, requests);
    for color in theme::PEN_SWATCHES {
        if tb.swatch(ctx, to_mq(color), "Pen color", app.board.pen.color == color) {
            app.set_pen_color(color);
        }
    }

    tb.separator();
    for (width, label) in theme::PEN_WIDTHS.into_iter().zip(["Thin", "Med", "Bold"]) {
        let active = (app.board.pen.stroke_width - width).abs() < f32::EPSILON;
        if tb.button(ctx, label, "Stroke width", active, true) {
            app.set_pen_width(width);
        }
    }
}

fn draw_command_row(ctx: &mut UiContext, app: &mut AppState, rect: Rect, now: f64, requests: &mut Vec<ShellRequest>) {
    let mut tb = Toolbar::new(rect);
    for id in ["edit.undo", "edit.redo", "edit.delete", "edit.clear_drawings", "board.reset"] {
        action_button(&mut tb, ctx, app, id, None, now, requests);
    }

    tb.separator();
    let view = app.view.label();
    action_button(&mut tb, ctx, app, "view.cycle", Some(view), now, requests);
    action_button(&mut tb, ctx, app, "view.zones", None, now, requests);
    action_button(&mut tb, ctx, app, "view.names", None, now, requests);

    tb.separator();
    action_button(&mut tb, ctx, app, "mode.set_piece", None, now, requests);

    tb.separator();
    action_button(&mut tb, ctx, app, "anim.mode", None, now, requests);
    let play = if app.is_playing() { "Stop" } else { "Play" };
    action_button(&mut tb, ctx, app, "anim.play", Some(play), now, requests);
    action_button(&mut tb, ctx, app, "anim.record", None, now, requests);
    action_button(&mut tb, ctx, app, "anim.export", None, now, requests);
    action_button(&mut tb, ctx, app, "anim.clear", None, now, requests);

    tb.separator();
    action_button(&mut tb, ctx, app, "export.screenshot", None, now, requests);
    tb.label(&format!("v{}", VERSION));
}

fn draw_side_panel(ctx: &mut UiContext, app: &mut AppState, rect: Rect, now: f64, requests: &mut Vec<ShellRequest>) {
    let mut col = Column::new(rect);
    let playing = app.is_playing();

    col.heading("Formations");
    let names: Vec<String> = app.board.formations().names().map(str::to_string).collect();
    for name in names {
        col.text(&name, theme::TEXT_DIM);
        let cells = col.cells(theme::TOOLBAR_ROW_HEIGHT - 8.0, 2);
        for (cell, team) in cells.into_iter().zip([Team::Home, Team::Away]) {
            let tip = format!("Line up {} in {}", team.label(), name);
            if ui::text_button(ctx, cell, team.label(), &tip, false, !playing) {
                app.apply_formation(&name, team, now);
            }
        }
    }

    if let Some(id) = app.board.selected_player() {
        let Some(player) = app.board.player(id).cloned() else {
            return;
        };
        col.heading(&format!("{} #{}", player.team.label(), player.number));

        match app.rename_field() {
            Some((rid, entry)) if rid == id => {
                if let Some(r) = col.row(theme::TOOLBAR_ROW_HEIGHT - 4.0) {
                    draw_text_field(r, entry, true, now);
                }
            }
            _ => {
                let name = player.name.as_deref().unwrap_or("(no name)");
                col.text(name, theme::TEXT_COLOR);
            }
        }
        if col.button(ctx, "Rename", &app.actions.tooltip("player.rename"), false, !playing) {
            requests.extend(app.run_action("player.rename", now));
        }
        let hide = if player.visible { "Hide" } else { "Show" };
        if col.button(ctx, hide, &app.actions.tooltip("player.toggle_visible"), false, !playing) {
            requests.extend(app.run_action("player.toggle_visible", now));
        }
        let photo = player.photo.as_deref().unwrap_or("Photo...");
        if col.button(ctx, photo, &app.actions.tooltip("player.photo"), false, !playing) {
            requests.extend(app.run_action("player.photo", now));
        }
        if let Some(instruction) = &player.instruction {
            col.text(instruction, theme::ACCENT_COLOR);
        }
    } else if let Selection::Drawing(_) = app.board.selection {
        if let Some(kind) = app.board.selected_drawing().map(|d| d.kind) {
            col.heading(kind.label());
            col.text("Drag the handles to reshape", theme::TEXT_DIM);
            if col.button(ctx, "Delete", &app.actions.tooltip("edit.delete"), false, !playing) {
                requests.extend(app.run_action("edit.delete", now));
            }
        }
    }

    if app.board.animation_mode() {
        col.heading("Movements");
        let active = app.board.active_move_piece();
        if col.button(ctx, "Ball", "Add waypoints to the ball", active == Some(board::MovePiece::Ball), !playing) {
            app.board.select_move_piece(Some(board::MovePiece::Ball));
        }
        let paths: Vec<(board::MovePiece, usize)> =
            app.board.movements.iter().map(|(piece, pts)| (*piece, pts.len())).collect();
        for (piece, count) in paths {
            let label = match piece {
                board::MovePiece::Ball => format!("Ball: {} steps  [clear]", count),
                board::MovePiece::Player(pid) => match app.board.player(pid) {
                    Some(p) => format!("{} #{}: {} steps  [clear]", p.team.label(), p.number, count),
                    None => continue,
                },
            };
            if col.button(ctx, &label, "Remove this path", active == Some(piece), !playing) {
                app.board.clear_movement(piece);
            }
        }
    }
}

fn draw_status_bar(app: &AppState, rect: Rect, now: f64) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::HEADER_COLOR);
    let y = (rect.y + (rect.h + theme::FONT_SIZE_CONTENT * 0.7) * 0.5).round();
    draw_text(&app.mode_hint(), rect.x + 8.0, y, theme::FONT_SIZE_CONTENT, theme::TEXT_DIM);

    if let Some((message, error)) = app.status(now) {
        let color = if error { theme::ERROR_COLOR } else { theme::TEXT_COLOR };
        let w = measure_text(message, None, theme::FONT_SIZE_CONTENT as u16, 1.0).width;
        draw_text(message, (rect.right() - w - 8.0).round(), y, theme::FONT_SIZE_CONTENT, color);
    }
}

fn handle_request(app: &mut AppState, request: ShellRequest, now: f64) {
    match request {
        #[cfg(not(target_arch = "wasm32"))]
        ShellRequest::PickPhoto(id) => {
            let dialog = rfd::FileDialog::new().add_filter("Image", &["png", "jpg", "jpeg", "bmp"]);
            let Some(path) = dialog.pick_file() else {
                return;
            };
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let label = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    app.load_photo(id, &bytes, &label, now);
                }
                Err(e) => app.set_error(&format!("Could not read {}: {}", path.display(), e), now),
            }
        }
        #[cfg(target_arch = "wasm32")]
        ShellRequest::PickPhoto(_) => {
            app.set_status("Photo upload not available in browser", now);
        }
    }
}
