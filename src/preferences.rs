//! Persisted user preferences: the custom screenshot directory and the grid width.

use crate::config::{
    DEFAULT_GRID_COLUMNS, MAX_GRID_COLUMNS, MIN_GRID_COLUMNS, PREFERENCES_DIR_NAME,
    PREFERENCES_FILE_NAME,
};
use crate::error::{AppError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk preference values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferenceValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_screenshot_directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_columns: Option<i64>,
}

/// JSON-file backed preference storage.
///
/// Reads are served from memory; every setter writes the whole file back.
/// A missing or unreadable file behaves like an empty one.
pub struct Preferences {
    file: PathBuf,
    values: PreferenceValues,
}

impl Preferences {
    /// Opens the preferences file in the platform config directory.
    pub fn open_default() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(PREFERENCES_DIR_NAME);
        Self::open(dir.join(PREFERENCES_FILE_NAME))
    }

    /// Opens preferences stored at `file`.
    pub fn open(file: PathBuf) -> Self {
        let values = match read_values(&file) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring preferences at {}: {}", file.display(), e);
                PreferenceValues::default()
            }
        };
        debug!("Loaded preferences from {}: {:?}", file.display(), values);
        Self { file, values }
    }

    /// Returns the user's directory override, if one is stored.
    pub fn custom_directory(&self) -> Option<&Path> {
        self.values.custom_screenshot_directory.as_deref()
    }

    /// Stores or removes the directory override.
    pub fn set_custom_directory(&mut self, path: Option<PathBuf>) {
        self.values.custom_screenshot_directory = path;
        self.persist();
    }

    /// Returns the grid column count, falling back to the default when out of range.
    pub fn grid_columns(&self) -> u8 {
        self.values
            .grid_columns
            .and_then(|columns| u8::try_from(columns).ok())
            .filter(|columns| (MIN_GRID_COLUMNS..=MAX_GRID_COLUMNS).contains(columns))
            .unwrap_or(DEFAULT_GRID_COLUMNS)
    }

    /// Stores the grid column count, clamped to the supported range.
    pub fn set_grid_columns(&mut self, columns: u8) -> u8 {
        let columns = columns.clamp(MIN_GRID_COLUMNS, MAX_GRID_COLUMNS);
        self.values.grid_columns = Some(i64::from(columns));
        self.persist();
        columns
    }

    fn persist(&self) {
        if let Err(e) = write_values(&self.file, &self.values) {
            warn!("Failed to save preferences: {}", e);
        }
    }
}

fn read_values(file: &Path) -> Result<PreferenceValues> {
    if !file.exists() {
        return Ok(PreferenceValues::default());
    }
    let text = fs::read_to_string(file)
        .map_err(|e| AppError::Preferences(format!("{}: {}", file.display(), e)))?;
    Ok(serde_json::from_str(&text)?)
}

fn write_values(file: &Path, values: &PreferenceValues) -> Result<()> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Preferences(format!("{}: {}", parent.display(), e)))?;
    }
    let text = serde_json::to_string_pretty(values)?;
    fs::write(file, text)
        .map_err(|e| AppError::Preferences(format!("{}: {}", file.display(), e)))
}
