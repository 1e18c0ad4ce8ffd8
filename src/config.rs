//! View and export settings, read from an optional YAML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::BassistError;
use crate::fretboard::{DisplayMode, Instrument, DEFAULT_DIAGRAM_FRETS, MAX_FRET};

/// View and export settings.
///
/// Loaded from an optional YAML file; every field has a default:
///
/// ```yaml
/// instrument: 5-string
/// display-mode: educational
/// columns: 2
/// diagram-frets: 7
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub instrument: Instrument,
    pub display_mode: DisplayMode,
    /// Cards per row in HTML export, 1 to 4
    pub columns: u8,
    /// Highest fret drawn in diagrams
    pub diagram_frets: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instrument: Instrument::FourString,
            display_mode: DisplayMode::Standard,
            columns: 1,
            diagram_frets: DEFAULT_DIAGRAM_FRETS,
        }
    }
}

impl Settings {
    /// Read settings from a YAML file; a missing file gives the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BassistError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| BassistError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, BassistError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings =
            serde_yaml::from_str(content).map_err(|e| BassistError::ConfigError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), BassistError> {
        if !(1..=4).contains(&self.columns) {
            return Err(BassistError::ConfigError(format!(
                "columns must be between 1 and 4, got {}",
                self.columns
            )));
        }
        if !(1..=MAX_FRET).contains(&self.diagram_frets) {
            return Err(BassistError::ConfigError(format!(
                "diagram-frets must be between 1 and {}, got {}",
                MAX_FRET, self.diagram_frets
            )));
        }
        Ok(())
    }
}
