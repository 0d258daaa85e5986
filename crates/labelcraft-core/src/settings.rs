//! Designer tunables.

use crate::snap::{GRID_SIZE, SnapMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of retained history entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
/// Smallest width a resize may produce, in percent.
pub const MIN_ELEMENT_WIDTH: f64 = 5.0;
/// Smallest height a resize may produce, in percent.
pub const MIN_ELEMENT_HEIGHT: f64 = 3.0;
/// Offset applied to duplicated elements, in percent on both axes.
pub const DUPLICATE_OFFSET: f64 = 5.0;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Per-session designer configuration.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerSettings {
    /// Maximum number of undo states to keep.
    pub history_capacity: usize,
    /// Grid spacing in percent.
    pub grid_size: f64,
    /// Snap mode applied to drags.
    pub snap: SnapMode,
    /// Resize floor for width, in percent.
    pub min_width: f64,
    /// Resize floor for height, in percent.
    pub min_height: f64,
    /// Offset for duplicated elements, in percent.
    pub duplicate_offset: f64,
}

impl Default for DesignerSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            grid_size: GRID_SIZE,
            snap: SnapMode::None,
            min_width: MIN_ELEMENT_WIDTH,
            min_height: MIN_ELEMENT_HEIGHT,
            duplicate_offset: DUPLICATE_OFFSET,
        }
    }
}

impl DesignerSettings {
    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.history_capacity == 0 {
            return Err(SettingsError::Invalid("historyCapacity must be at least 1".into()));
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0 && self.grid_size <= 100.0) {
            return Err(SettingsError::Invalid(format!(
                "gridSize must be in (0, 100], got {}",
                self.grid_size
            )));
        }
        for (name, value) in [("minWidth", self.min_width), ("minHeight", self.min_height)] {
            if !(value.is_finite() && value > 0.0 && value <= 100.0) {
                return Err(SettingsError::Invalid(format!("{name} must be in (0, 100], got {value}")));
            }
        }
        if !self.duplicate_offset.is_finite() {
            return Err(SettingsError::Invalid("duplicateOffset must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DesignerSettings::default();
        assert_eq!(settings.history_capacity, 50);
        assert_eq!(settings.grid_size, 5.0);
        assert_eq!(settings.min_width, 5.0);
        assert_eq!(settings.min_height, 3.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings = DesignerSettings::from_json(r#"{ "snap": "grid", "historyCapacity": 10 }"#).unwrap();
        assert_eq!(settings.snap, SnapMode::Grid);
        assert_eq!(settings.history_capacity, 10);
        assert_eq!(settings.grid_size, GRID_SIZE);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = DesignerSettings::from_json(r#"{ "historyCapacity": 0 }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(DesignerSettings::from_json("{"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = DesignerSettings {
            snap: SnapMode::Grid,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(DesignerSettings::from_json(&json).unwrap(), settings);
    }
}
