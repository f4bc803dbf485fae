//! Game settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CELL_SIZE, COLS, FONT_SIZE, FRAME_RATE, ROWS, SPAWN_ROW};

/// Largest accepted cell size in pixels
pub const MAX_CELL_SIZE: i32 = 1024;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in settings file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield width in cells (one terminal column each)
    pub width: u16,
    /// Playfield height in cells (one terminal row each)
    pub height: u16,
    /// Pixels per cell
    pub cell_size: i32,
    /// Glyph size for the robot (artifacts copy it)
    pub font_size: u32,
    /// Target frames per second
    pub frame_rate: u32,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Drop artifacts once they fall below the bottom edge
    pub cull_offscreen: bool,
    /// Window caption
    pub caption: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: COLS,
            height: ROWS,
            cell_size: CELL_SIZE,
            font_size: FONT_SIZE,
            frame_rate: FRAME_RATE,
            seed: None,
            cull_offscreen: true,
            caption: "Greed".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "playfield must be at least 1x1 cells, got {}x{}",
                self.width, self.height
            )));
        }
        if !(1..=MAX_CELL_SIZE).contains(&self.cell_size) {
            return Err(SettingsError::Invalid(format!(
                "cell_size must be in 1..={}, got {}",
                MAX_CELL_SIZE, self.cell_size
            )));
        }
        // Pixel extents, the spawn row and one step past the edge must fit in i32
        let fits = |cells: u16| {
            (i32::from(cells) + 1)
                .checked_mul(self.cell_size)
                .and(SPAWN_ROW.checked_mul(self.cell_size))
                .is_some()
        };
        if !fits(self.width) || !fits(self.height) {
            return Err(SettingsError::Invalid(format!(
                "playfield {}x{} at cell_size {} overflows pixel coordinates",
                self.width, self.height, self.cell_size
            )));
        }
        if self.frame_rate == 0 {
            return Err(SettingsError::Invalid("frame_rate must be positive".into()));
        }
        Ok(())
    }

    /// Configured seed, or one drawn from the system clock
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Playfield width in pixels
    pub fn pixel_width(&self) -> i32 {
        i32::from(self.width) * self.cell_size
    }

    /// Playfield height in pixels
    pub fn pixel_height(&self) -> i32 {
        i32::from(self.height) * self.cell_size
    }
}
