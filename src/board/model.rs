//! Board entities: players, ball, drawings, movements, snapshots

use serde::{Deserialize, Serialize};

use crate::pitch::{self, Point, PITCH_HEIGHT, PITCH_MARGIN};
use crate::rasterizer::font;
use crate::rasterizer::{bounds_of, bounds_of_points, ellipse_points, quad_bezier_points, Color};

/// Players per team. Never changes after creation.
pub const TEAM_SIZE: usize = 11;

/// Logical units per font pixel for text drawings
pub const TEXT_SCALE: f32 = 2.0;

/// Stable player identity (index into the board's player list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Home,
    Away,
}

impl Team {
    pub fn label(self) -> &'static str {
        match self {
            Team::Home => "Home",
            Team::Away => "Away",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Outfield,
    Goalkeeper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team: Team,
    pub role: Role,
    /// Shirt number, 1-11, fixed at creation
    pub number: u8,
    pub name: Option<String>,
    pub pos: Point,
    pub visible: bool,
    /// Reference to an imported photo (file name or label)
    pub photo: Option<String>,
    /// Set-piece instruction text
    pub instruction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Point,
}

impl Default for Ball {
    fn default() -> Self {
        Self { pos: pitch::center() }
    }
}

/// Canonical border layout: home team spread along the top border of the
/// left half, away team along the bottom border of the right half.
pub fn canonical_players() -> Vec<Player> {
    let half = pitch::PLAY_LENGTH * 0.5;
    let step = half / (TEAM_SIZE as f32 + 1.0);
    let top_y = PITCH_MARGIN * 0.5;
    let bottom_y = PITCH_HEIGHT - PITCH_MARGIN * 0.5;

    let mut players = Vec::with_capacity(TEAM_SIZE * 2);
    for (team, x0, y) in [
        (Team::Home, pitch::left_line(), top_y),
        (Team::Away, pitch::center().x, bottom_y),
    ] {
        for i in 0..TEAM_SIZE {
            let number = i as u8 + 1;
            players.push(Player {
                id: PlayerId(players.len()),
                team,
                role: if number == 1 { Role::Goalkeeper } else { Role::Outfield },
                number,
                name: None,
                pos: Point::new(x0 + step * (i as f32 + 1.0), y),
                visible: true,
                photo: None,
                instruction: None,
            });
        }
    }
    players
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrawingId(pub u32);

/// Kind of tactical annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawingKind {
    Line,
    Arrow,
    /// Dashed arrow for off-the-ball runs
    RunArrow,
    Triangle,
    Rectangle,
    Ellipse,
    /// Translucent filled area
    Zone,
    CurvedArrow,
    Text,
}

impl DrawingKind {
    pub fn label(self) -> &'static str {
        match self {
            DrawingKind::Line => "Line",
            DrawingKind::Arrow => "Arrow",
            DrawingKind::RunArrow => "Run",
            DrawingKind::Triangle => "Triangle",
            DrawingKind::Rectangle => "Rect",
            DrawingKind::Ellipse => "Ellipse",
            DrawingKind::Zone => "Zone",
            DrawingKind::CurvedArrow => "Curve",
            DrawingKind::Text => "Text",
        }
    }

    /// True for kinds with an arrow head at `end`
    pub fn has_arrow_head(self) -> bool {
        matches!(self, DrawingKind::Arrow | DrawingKind::RunArrow | DrawingKind::CurvedArrow)
    }
}

/// Stroke settings applied to new drawings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    pub filled: bool,
    pub stroke_width: f32,
}

impl Default for Pen {
    fn default() -> Self {
        Self { color: Color::YELLOW, filled: false, stroke_width: 3.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    pub kind: DrawingKind,
    pub start: Point,
    pub end: Point,
    /// Triangle vertices, or the single control point of a curved arrow
    pub points: Vec<Point>,
    pub color: Color,
    pub filled: bool,
    pub stroke_width: f32,
    pub text: Option<String>,
}

impl Drawing {
    /// New shape spanning `start`..`end`. Triangles and curves get their
    /// control points seeded from the bounding box.
    pub fn shape(id: DrawingId, kind: DrawingKind, start: Point, end: Point, pen: Pen) -> Self {
        let points = match kind {
            DrawingKind::Triangle => {
                let (min, max) = bounds_of(start, end);
                vec![
                    Point::new((min.x + max.x) * 0.5, min.y),
                    Point::new(max.x, max.y),
                    Point::new(min.x, max.y),
                ]
            }
            DrawingKind::CurvedArrow => vec![default_curve_control(start, end)],
            _ => Vec::new(),
        };
        Self {
            id,
            kind,
            start,
            end,
            points,
            color: pen.color,
            filled: pen.filled || kind == DrawingKind::Zone,
            stroke_width: pen.stroke_width,
            text: None,
        }
    }

    /// Text label with its top-left corner at `at`
    pub fn label(id: DrawingId, at: Point, text: &str, pen: Pen) -> Self {
        let end = at + Point::new(font::text_width(text, TEXT_SCALE), font::text_height(TEXT_SCALE));
        Self {
            id,
            kind: DrawingKind::Text,
            start: at,
            end,
            points: Vec::new(),
            color: pen.color,
            filled: false,
            stroke_width: pen.stroke_width,
            text: Some(text.to_string()),
        }
    }

    /// Axis-aligned bounds of the defining geometry
    pub fn bounds(&self) -> (Point, Point) {
        match self.kind {
            DrawingKind::Triangle => bounds_of_points(&self.points).unwrap_or_else(|| bounds_of(self.start, self.end)),
            DrawingKind::Text => self.label_box(),
            _ => bounds_of(self.start, self.end),
        }
    }

    /// Control point of a curved arrow
    pub fn curve_control(&self) -> Point {
        self.points.first().copied().unwrap_or_else(|| default_curve_control(self.start, self.end))
    }

    /// Box covering a text label
    pub fn label_box(&self) -> (Point, Point) {
        let text = self.text.as_deref().unwrap_or("");
        let size = Point::new(font::text_width(text, TEXT_SCALE), font::text_height(TEXT_SCALE));
        (self.start, self.start + size)
    }

    /// Ellipse centre and radii
    pub fn ellipse(&self) -> (Point, f32, f32) {
        let (min, max) = bounds_of(self.start, self.end);
        ((min + max) * 0.5, (max.x - min.x) * 0.5, (max.y - min.y) * 0.5)
    }

    /// The outline as a polyline, and whether it is closed.
    /// Used both for painting and for hit-testing.
    pub fn outline(&self) -> (Vec<Point>, bool) {
        match self.kind {
            DrawingKind::Line | DrawingKind::Arrow | DrawingKind::RunArrow => (vec![self.start, self.end], false),
            DrawingKind::Rectangle | DrawingKind::Zone | DrawingKind::Text => {
                let (min, max) = self.bounds();
                (
                    vec![min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)],
                    true,
                )
            }
            DrawingKind::Triangle => (self.points.clone(), true),
            DrawingKind::Ellipse => {
                let (c, rx, ry) = self.ellipse();
                (ellipse_points(c, rx, ry, 48), true)
            }
            DrawingKind::CurvedArrow => {
                (quad_bezier_points(self.start, self.curve_control(), self.end, 24), false)
            }
        }
    }
}

/// Default curve control: offset perpendicular from the midpoint by a
/// quarter of the chord length
pub fn default_curve_control(start: Point, end: Point) -> Point {
    let chord = end - start;
    start.midpoint(end) + chord.perp().normalize() * (chord.len() * 0.25)
}

/// Subject of a movement path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MovePiece {
    Player(PlayerId),
    Ball,
}

/// Undo unit: everything except movements and tool state
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub players: Vec<Player>,
    pub ball: Ball,
    pub drawings: Vec<Drawing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_layout() {
        let players = canonical_players();
        assert_eq!(players.len(), 22);
        for team in [Team::Home, Team::Away] {
            let mut numbers: Vec<u8> = players.iter().filter(|p| p.team == team).map(|p| p.number).collect();
            numbers.sort();
            assert_eq!(numbers, (1..=11).collect::<Vec<u8>>());
        }
        let keepers: Vec<&Player> = players.iter().filter(|p| p.role == Role::Goalkeeper).collect();
        assert_eq!(keepers.len(), 2);
        assert!(keepers.iter().all(|p| p.number == 1));

        // Home on the left half top border, away on the right half bottom border
        let mid = pitch::center().x;
        for p in &players {
            assert_eq!(p.id, PlayerId(players.iter().position(|q| q.id == p.id).unwrap()));
            match p.team {
                Team::Home => assert!(p.pos.x < mid && p.pos.y < pitch::top_line()),
                Team::Away => assert!(p.pos.x > mid && p.pos.y > pitch::bottom_line()),
            }
        }
    }

    #[test]
    fn test_triangle_seeds_vertices_from_bbox() {
        let d = Drawing::shape(
            DrawingId(1),
            DrawingKind::Triangle,
            Point::new(100.0, 300.0),
            Point::new(200.0, 100.0),
            Pen::default(),
        );
        assert_eq!(d.points.len(), 3);
        assert_eq!(d.points[0], Point::new(150.0, 100.0));
        assert_eq!(d.bounds(), (Point::new(100.0, 100.0), Point::new(200.0, 300.0)));
    }

    #[test]
    fn test_zone_is_always_filled() {
        let d = Drawing::shape(DrawingId(1), DrawingKind::Zone, Point::ZERO, Point::new(50.0, 50.0), Pen::default());
        assert!(d.filled);
        let r = Drawing::shape(DrawingId(2), DrawingKind::Rectangle, Point::ZERO, Point::new(50.0, 50.0), Pen::default());
        assert!(!r.filled);
    }

    #[test]
    fn test_curve_control_is_off_the_chord() {
        let d = Drawing::shape(
            DrawingId(1),
            DrawingKind::CurvedArrow,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Pen::default(),
        );
        let c = d.curve_control();
        assert!((c.x - 50.0).abs() < 0.001);
        assert!((c.y.abs() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_label_box_grows_with_text() {
        let short = Drawing::label(DrawingId(1), Point::new(10.0, 10.0), "A", Pen::default());
        let long = Drawing::label(DrawingId(2), Point::new(10.0, 10.0), "PRESS HIGH", Pen::default());
        assert!(long.label_box().1.x > short.label_box().1.x);
        assert_eq!(short.label_box().0, Point::new(10.0, 10.0));
    }
}
