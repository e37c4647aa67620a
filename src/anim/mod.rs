//! Animation engine
//!
//! [`Playback`] turns authored movement paths into interpolated positions
//! over time. One eased progress value drives every piece; each leg (start
//! to first waypoint, then waypoint to waypoint) lasts the same time, so
//! pieces with fewer waypoints finish early and hold their last position.
//!
//! The frame loop lives with the caller: it calls [`Playback::tick`] once per
//! displayed frame and stops when it returns `None`. [`Playback::run`] does
//! the same with a fixed time step for headless use.

pub mod recorder;

pub use recorder::Recorder;

use std::collections::BTreeMap;

use crate::board::{Ball, MovePiece, Player};
use crate::pitch::Point;

/// Default seconds per leg
pub const DEFAULT_LEG_DURATION: f64 = 1.2;

/// Quadratic ease-in-out on [0, 1]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
    }
}

/// Interpolated positions for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    /// Position per player, indexed like the board's player list
    pub players: Vec<Point>,
    pub ball: Point,
    /// Linear progress in [0, 1]
    pub progress: f32,
}

impl AnimationFrame {
    /// Copy of `players` moved to this frame's positions
    pub fn apply(&self, players: &[Player]) -> Vec<Player> {
        players
            .iter()
            .zip(self.players.iter())
            .map(|(p, pos)| Player { pos: *pos, ..p.clone() })
            .collect()
    }

    pub fn ball(&self) -> Ball {
        Ball { pos: self.ball }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Created, first tick not seen yet
    Ready,
    Playing,
    Finished,
    Stopped,
}

/// One piece's path: its start position followed by its waypoints
#[derive(Debug, Clone)]
struct Track {
    piece: MovePiece,
    path: Vec<Point>,
}

impl Track {
    fn legs(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Position after `elapsed_legs` legs (fractional)
    fn position(&self, elapsed_legs: f32) -> Point {
        let legs = self.legs();
        let last = self.path[self.path.len() - 1];
        if legs == 0 || elapsed_legs >= legs as f32 {
            return last;
        }
        let elapsed = elapsed_legs.max(0.0);
        let leg = (elapsed.floor() as usize).min(legs - 1);
        let frac = elapsed - leg as f32;
        self.path[leg].lerp(self.path[leg + 1], frac)
    }
}

pub struct Playback {
    tracks: Vec<Track>,
    base_players: Vec<Point>,
    base_ball: Point,
    max_legs: usize,
    leg_duration: f64,
    started_at: Option<f64>,
    progress: f32,
    state: PlaybackState,
}

impl Playback {
    /// None when there is nothing to animate
    pub fn new(
        movements: &BTreeMap<MovePiece, Vec<Point>>,
        players: &[Player],
        ball: &Ball,
        leg_duration: f64,
    ) -> Option<Self> {
        let mut tracks = Vec::new();
        for (piece, waypoints) in movements {
            if waypoints.is_empty() {
                continue;
            }
            let start = match piece {
                MovePiece::Ball => ball.pos,
                MovePiece::Player(id) => match players.get(id.0) {
                    Some(p) => p.pos,
                    None => continue,
                },
            };
            let mut path = Vec::with_capacity(waypoints.len() + 1);
            path.push(start);
            path.extend_from_slice(waypoints);
            tracks.push(Track { piece: *piece, path });
        }

        let max_legs = tracks.iter().map(Track::legs).max().unwrap_or(0);
        if max_legs == 0 {
            return None;
        }

        Some(Self {
            tracks,
            base_players: players.iter().map(|p| p.pos).collect(),
            base_ball: ball.pos,
            max_legs,
            leg_duration: if leg_duration > 0.0 { leg_duration } else { DEFAULT_LEG_DURATION },
            started_at: None,
            progress: 0.0,
            state: PlaybackState::Ready,
        })
    }

    /// Seconds from first frame to completion
    pub fn total_duration(&self) -> f64 {
        self.max_legs as f64 * self.leg_duration
    }

    pub fn max_legs(&self) -> usize {
        self.max_legs
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state(), PlaybackState::Ready | PlaybackState::Playing)
    }

    /// Halt immediately and reset progress
    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("Playback stopped at {:.0}%", self.progress * 100.0);
        }
        self.state = PlaybackState::Stopped;
        self.progress = 0.0;
    }

    /// Advance to time `now` (seconds, any monotonic clock). Returns the frame
    /// to draw, or None once playback has finished or been stopped.
    pub fn tick(&mut self, now: f64) -> Option<AnimationFrame> {
        if !self.is_running() {
            return None;
        }
        let start = *self.started_at.get_or_insert(now);
        self.state = PlaybackState::Playing;

        let raw = ((now - start) / self.total_duration()).clamp(0.0, 1.0) as f32;
        self.progress = self.progress.max(raw);
        if raw >= 1.0 {
            self.progress = 1.0;
            self.state = PlaybackState::Finished;
        }

        Some(self.frame_at(self.progress))
    }

    /// Positions at linear progress `t`
    pub fn frame_at(&self, t: f32) -> AnimationFrame {
        let elapsed_legs = ease_in_out_quad(t) * self.max_legs as f32;
        let mut players = self.base_players.clone();
        let mut ball = self.base_ball;
        for track in &self.tracks {
            let pos = track.position(elapsed_legs);
            match track.piece {
                MovePiece::Ball => ball = pos,
                MovePiece::Player(id) => {
                    if let Some(slot) = players.get_mut(id.0) {
                        *slot = pos;
                    }
                }
            }
        }
        AnimationFrame { players, ball, progress: t }
    }

    /// Drive the playback with a fixed `step` (seconds). `on_frame` returns
    /// false to stop early. Returns the number of frames produced.
    pub fn run<F>(&mut self, step: f64, mut on_frame: F) -> usize
    where
        F: FnMut(&AnimationFrame) -> bool,
    {
        let step = if step > 0.0 { step } else { 1.0 / 60.0 };
        let mut now = 0.0;
        let mut frames = 0;
        while let Some(frame) = self.tick(now) {
            frames += 1;
            if !on_frame(&frame) {
                self.stop();
                break;
            }
            now += step;
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::model::canonical_players;
    use crate::board::PlayerId;

    fn scenario() -> (BTreeMap<MovePiece, Vec<Point>>, Vec<Player>, Ball) {
        let players = canonical_players();
        let ball = Ball { pos: Point::new(100.0, 100.0) };
        let mut movements = BTreeMap::new();
        movements.insert(
            MovePiece::Ball,
            vec![Point::new(200.0, 100.0), Point::new(200.0, 200.0), Point::new(300.0, 200.0)],
        );
        movements.insert(MovePiece::Player(PlayerId(4)), vec![Point::new(400.0, 300.0)]);
        (movements, players, ball)
    }

    #[test]
    fn test_ease_endpoints_and_symmetry() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_quad(0.25) + ease_in_out_quad(0.75) - 1.0).abs() < 1e-6);
        let mut last = 0.0;
        for i in 0..=100 {
            let v = ease_in_out_quad(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_nothing_to_play() {
        let players = canonical_players();
        let mut movements = BTreeMap::new();
        movements.insert(MovePiece::Ball, Vec::new());
        assert!(Playback::new(&movements, &players, &Ball::default(), 1.0).is_none());
    }

    #[test]
    fn test_duration_uses_longest_path() {
        let (movements, players, ball) = scenario();
        let pb = Playback::new(&movements, &players, &ball, 0.5).unwrap();
        assert_eq!(pb.max_legs(), 3);
        assert!((pb.total_duration() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_monotonic_and_reaches_one() {
        let (movements, players, ball) = scenario();
        let mut pb = Playback::new(&movements, &players, &ball, 0.5).unwrap();
        let mut seen = Vec::new();
        let frames = pb.run(1.0 / 30.0, |f| {
            seen.push(f.progress);
            true
        });
        assert!(frames > 40);
        assert!(seen.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(seen.last().copied(), Some(1.0));
        assert_eq!(pb.state(), PlaybackState::Finished);
        assert!(pb.tick(100.0).is_none());
    }

    #[test]
    fn test_final_positions_and_short_paths_finish_early() {
        let (movements, players, ball) = scenario();
        let pb = Playback::new(&movements, &players, &ball, 1.0).unwrap();
        let end = pb.frame_at(1.0);
        assert_eq!(end.ball, Point::new(300.0, 200.0));
        assert_eq!(end.players[4], Point::new(400.0, 300.0));
        // Untouched players keep their place
        assert_eq!(end.players[0], players[0].pos);

        // Eased progress at one third of the legs: the one-leg player is done
        let t = (1.0f32 / 3.0 * 2.0).sqrt() * 0.5 + 0.001;
        let mid = pb.frame_at(t);
        assert_eq!(mid.players[4], Point::new(400.0, 300.0));
        assert_ne!(mid.ball, Point::new(300.0, 200.0));
    }

    #[test]
    fn test_waypoints_hit_at_leg_boundaries() {
        let (movements, players, ball) = scenario();
        let pb = Playback::new(&movements, &players, &ball, 1.0).unwrap();
        // Halfway through eased time the ball is halfway through its legs
        let mid = pb.frame_at(0.5);
        let expected = Point::new(200.0, 150.0);
        assert!(mid.ball.distance(expected) < 0.01, "{:?}", mid.ball);
    }

    #[test]
    fn test_stop_resets_and_halts() {
        let (movements, players, ball) = scenario();
        let mut pb = Playback::new(&movements, &players, &ball, 1.0).unwrap();
        let mut calls = 0;
        pb.run(0.1, |_| {
            calls += 1;
            calls < 5
        });
        assert_eq!(calls, 5);
        assert_eq!(pb.progress(), 0.0);
        assert_eq!(pb.state(), PlaybackState::Stopped);
        assert!(pb.tick(0.3).is_none());
    }

    #[test]
    fn test_frame_apply_moves_players() {
        let (movements, players, ball) = scenario();
        let pb = Playback::new(&movements, &players, &ball, 1.0).unwrap();
        let moved = pb.frame_at(1.0).apply(&players);
        assert_eq!(moved[4].pos, Point::new(400.0, 300.0));
        assert_eq!(moved[4].number, players[4].number);
    }
}
