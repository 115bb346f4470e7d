//! Board timing and layout settings
//!
//! Persisted as JSON next to the host application.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Cell;

/// Settings load/save failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file could not be accessed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Visual placement of the 4x4 cells
///
/// `origin` is the center of cell (0, 0). Columns grow along +x, rows grow
/// along -y (row 0 is the top row in a y-up scene).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub origin: Vec2,
    pub pitch: Vec2,
}

impl Default for BoardLayout {
    fn default() -> Self {
        let half_span = DEFAULT_CELL_PITCH * (GRID_SIZE as f32 - 1.0) / 2.0;
        Self {
            origin: Vec2::new(-half_span, half_span),
            pitch: Vec2::splat(DEFAULT_CELL_PITCH),
        }
    }
}

impl BoardLayout {
    /// Center of the given cell in scene coordinates
    pub fn slot_position(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.col as f32).mul_add(self.pitch.x, self.origin.x),
            -(cell.row as f32).mul_add(self.pitch.y, -self.origin.y),
        )
    }
}

/// Swipe board settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSettings {
    /// Duration of each of the two chained swap animations (seconds)
    pub swap_duration_seconds: f32,
    /// Abandon a swap stage that runs longer than this (None = wait forever)
    pub swap_timeout_seconds: Option<f32>,
    /// Cell placement used for empty cells
    pub layout: BoardLayout,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            swap_duration_seconds: DEFAULT_SWAP_DURATION,
            swap_timeout_seconds: None,
            layout: BoardLayout::default(),
        }
    }
}

impl SwipeSettings {
    /// Settings matching the earlier parallel-swap timing
    pub fn legacy() -> Self {
        Self {
            swap_duration_seconds: LEGACY_SWAP_DURATION,
            ..Self::default()
        }
    }

    /// Swap duration clamped to a usable value
    pub fn effective_swap_duration(&self) -> f32 {
        if self.swap_duration_seconds.is_finite() {
            self.swap_duration_seconds.max(0.0)
        } else {
            0.0
        }
    }

    /// Timeout, ignoring nonsensical values
    pub fn effective_swap_timeout(&self) -> Option<f32> {
        self.swap_timeout_seconds
            .filter(|t| t.is_finite() && *t > 0.0)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
