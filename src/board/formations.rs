//! Formation templates
//!
//! The catalog ships in `assets/formations.ron`. Slots are normalized: x from
//! the team's own goal line (0.0) towards the opponent's (1.0), y across the
//! pitch. Home attacks left to right; away slots are mirrored horizontally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pitch::{self, Point};
use super::model::{Team, TEAM_SIZE};

const BUILTIN_FORMATIONS: &str = include_str!("../../assets/formations.ron");

#[derive(Error, Debug)]
pub enum FormationError {
    #[error("Unknown formation: {0}")]
    Unknown(String),

    #[error("Formation {name} has {found} slots, expected 11")]
    WrongSlotCount { name: String, found: usize },

    #[error("Formation catalog parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationTemplate {
    pub name: String,
    /// Normalized (x, y) per shirt number, index 0 = number 1
    pub slots: Vec<(f32, f32)>,
}

impl FormationTemplate {
    /// Logical position for shirt `number` (1-11) when played by `team`
    pub fn position(&self, number: u8, team: Team) -> Option<Point> {
        let (nx, ny) = *self.slots.get((number as usize).checked_sub(1)?)?;
        let x = match team {
            Team::Home => pitch::left_line() + nx * pitch::PLAY_LENGTH,
            Team::Away => pitch::right_line() - nx * pitch::PLAY_LENGTH,
        };
        let y = pitch::top_line() + ny * pitch::PLAY_WIDTH;
        Some(Point::new(x, y))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormationCatalog {
    templates: Vec<FormationTemplate>,
}

impl FormationCatalog {
    /// Parse a RON list of templates
    pub fn from_ron(source: &str) -> Result<Self, FormationError> {
        let templates: Vec<FormationTemplate> = ron::from_str(source)?;
        for t in &templates {
            if t.slots.len() != TEAM_SIZE {
                return Err(FormationError::WrongSlotCount { name: t.name.clone(), found: t.slots.len() });
            }
        }
        Ok(Self { templates })
    }

    /// The catalog bundled with the binary. Falls back to an empty catalog
    /// if the asset is broken.
    pub fn builtin() -> Self {
        match Self::from_ron(BUILTIN_FORMATIONS) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load built-in formations: {}", e);
                Self::default()
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&FormationTemplate, FormationError> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| FormationError::Unknown(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = FormationCatalog::builtin();
        for name in ["1-4-3-3", "1-4-4-2", "1-4-2-3-1", "1-3-5-2", "1-3-4-3", "1-5-3-2", "1-4-1-4-1"] {
            assert!(catalog.get(name).is_ok(), "missing {}", name);
        }
        assert!(matches!(catalog.get("2-3-5"), Err(FormationError::Unknown(_))));
    }

    #[test]
    fn test_slots_land_inside_playing_area() {
        let catalog = FormationCatalog::builtin();
        for name in catalog.names() {
            let t = catalog.get(name).unwrap();
            for team in [Team::Home, Team::Away] {
                for n in 1..=11u8 {
                    let p = t.position(n, team).unwrap();
                    assert!(p.x >= pitch::left_line() && p.x <= pitch::right_line(), "{} #{}", name, n);
                    assert!(p.y >= pitch::top_line() && p.y <= pitch::bottom_line(), "{} #{}", name, n);
                }
            }
        }
    }

    #[test]
    fn test_away_is_mirror_of_home() {
        let catalog = FormationCatalog::builtin();
        let t = catalog.get("1-4-4-2").unwrap();
        for n in 1..=11u8 {
            let home = t.position(n, Team::Home).unwrap();
            let away = t.position(n, Team::Away).unwrap();
            assert!((home.x + away.x - pitch::PITCH_WIDTH).abs() < 0.01);
            assert_eq!(home.y, away.y);
        }
        assert!(t.position(0, Team::Home).is_none());
        assert!(t.position(12, Team::Home).is_none());
    }

    #[test]
    fn test_wrong_slot_count_rejected() {
        let src = r#"[(name: "tiny", slots: [(0.0, 0.5)])]"#;
        assert!(matches!(
            FormationCatalog::from_ron(src),
            Err(FormationError::WrongSlotCount { found: 1, .. })
        ));
        assert!(matches!(FormationCatalog::from_ron("[("), Err(FormationError::Parse(_))));
    }
}
