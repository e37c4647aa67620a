//! User configuration loaded from `coach_lab.ron`

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anim::{recorder::DEFAULT_FPS, DEFAULT_LEG_DURATION};
use crate::board::history::DEFAULT_HISTORY_LIMIT;
use crate::board::BoardSettings;

pub const CONFIG_FILE: &str = "coach_lab.ron";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every field is optional in the file; missing ones take the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Seconds per movement leg
    pub leg_duration: f64,
    pub history_limit: usize,
    pub min_drag_distance: f32,
    pub hit_radius: f32,
    pub handle_radius: f32,
    pub drawing_tolerance: f32,
    /// Forces the device pixel ratio instead of asking the window
    pub pixel_ratio_override: Option<f32>,
    /// Where screenshots and recordings go
    pub export_dir: PathBuf,
    pub recording_fps: u32,
}

impl Default for LabConfig {
    fn default() -> Self {
        let board = BoardSettings::default();
        Self {
            leg_duration: DEFAULT_LEG_DURATION,
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_drag_distance: board.min_drag_distance,
            hit_radius: board.hit_radius,
            handle_radius: board.handle_radius,
            drawing_tolerance: board.drawing_tolerance,
            pixel_ratio_override: None,
            export_dir: PathBuf::from("exports"),
            recording_fps: DEFAULT_FPS,
        }
    }
}

impl LabConfig {
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: LabConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    /// Look for the config file in the working directory, then next to the
    /// executable. Missing file means defaults; a broken one is logged and
    /// replaced by defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::find() else {
            log::debug!("No {} found, using defaults", CONFIG_FILE);
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn find() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let exe = std::env::current_exe().ok()?;
        let beside = exe.parent()?.join(CONFIG_FILE);
        beside.is_file().then_some(beside)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.leg_duration > 0.0) {
            return Err(ConfigError::Invalid {
                field: "leg_duration",
                reason: format!("must be positive, got {}", self.leg_duration),
            });
        }
        for (field, value) in [
            ("min_drag_distance", self.min_drag_distance),
            ("hit_radius", self.hit_radius),
            ("handle_radius", self.handle_radius),
            ("drawing_tolerance", self.drawing_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, reason: format!("must be zero or more, got {}", value) });
            }
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid { field: "history_limit", reason: "must be at least 1".into() });
        }
        if let Some(ratio) = self.pixel_ratio_override {
            if !(ratio > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "pixel_ratio_override",
                    reason: format!("must be positive, got {}", ratio),
                });
            }
        }
        if self.recording_fps == 0 {
            return Err(ConfigError::Invalid { field: "recording_fps", reason: "must be at least 1".into() });
        }
        Ok(())
    }

    pub fn board_settings(&self) -> BoardSettings {
        BoardSettings {
            min_drag_distance: self.min_drag_distance,
            hit_radius: self.hit_radius,
            handle_radius: self.handle_radius,
            drawing_tolerance: self.drawing_tolerance,
            history_limit: self.history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = LabConfig::from_ron("(leg_duration: 2.5, export_dir: \"shots\")").unwrap();
        assert_eq!(config.leg_duration, 2.5);
        assert_eq!(config.export_dir, PathBuf::from("shots"));
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.recording_fps, DEFAULT_FPS);
    }

    #[test]
    fn test_pixel_ratio_override() {
        let config = LabConfig::from_ron("(pixel_ratio_override: Some(2.0))").unwrap();
        assert_eq!(config.pixel_ratio_override, Some(2.0));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            LabConfig::from_ron("(leg_duration: 0.0)"),
            Err(ConfigError::Invalid { field: "leg_duration", .. })
        ));
        assert!(matches!(
            LabConfig::from_ron("(history_limit: 0)"),
            Err(ConfigError::Invalid { field: "history_limit", .. })
        ));
        assert!(matches!(LabConfig::from_ron("(leg_duration: \"fast\")"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_distances_rejected() {
        assert!(matches!(
            LabConfig::from_ron("(drawing_tolerance: -1.0)"),
            Err(ConfigError::Invalid { field: "drawing_tolerance", .. })
        ));
        assert!(matches!(
            LabConfig::from_ron("(hit_radius: -0.5)"),
            Err(ConfigError::Invalid { field: "hit_radius", .. })
        ));
        let config = LabConfig { handle_radius: f32::NAN, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "handle_radius", .. })));
        let config = LabConfig { min_drag_distance: f32::INFINITY, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "min_drag_distance", .. })));
        assert!(LabConfig::from_ron("(min_drag_distance: 0.0)").is_ok());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "(hit_radius: 20.0, history_limit: 10)").unwrap();
        let config = LabConfig::load(&path).unwrap();
        let board = config.board_settings();
        assert_eq!(board.hit_radius, 20.0);
        assert_eq!(board.history_limit, 10);
        assert!(matches!(LabConfig::load(&dir.path().join("missing.ron")), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_defaults_match_board() {
        let config = LabConfig::default();
        let board = BoardSettings::default();
        assert_eq!(config.board_settings().min_drag_distance, board.min_drag_distance);
        assert_eq!(config.board_settings().history_limit, board.history_limit);
    }
}
