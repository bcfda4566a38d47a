use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::position::{PlotOptions, DEFAULT_MARKER_HALF_SIZE};

pub const APP_DIR: &str = "hotspot-picker";

/// App configuration stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Radius of the hotspot marker, subtracted from click coordinates.
    pub marker_half_size: f64,
    /// Right-click zeroes the position instead of plotting it.
    pub secondary_clears: bool,
    /// Reject non-numeric coordinate text and clamp coordinates to 0..=100.
    pub strict_coordinates: bool,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            marker_half_size: DEFAULT_MARKER_HALF_SIZE,
            secondary_clears: true,
            strict_coordinates: false,
            window_size: [1200.0, 800.0],
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring config: {err}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| AppError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            marker_half_size: self.marker_half_size,
            secondary_clears: self.secondary_clears,
        }
    }
}
