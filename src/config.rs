//! Application configuration file support.
//!
//! Reads grid and store settings from a TOML file. Every field has a
//! default so a missing file or empty table still yields a working local
//! setup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::StoreError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Window sizing and the venue's daily rollover rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Days fetched per window load.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Venue-local hour of the rollover cutoff.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
    /// Venue-local minute of the rollover cutoff.
    #[serde(default = "default_cutoff_minute")]
    pub cutoff_minute: u32,
    /// Venue timezone as a whole-hour UTC offset.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

/// Store backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Backend type: "memory" or "file".
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,
    /// Root directory for the file backend.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

fn default_window_size() -> usize {
    30
}

fn default_cutoff_hour() -> u32 {
    8
}

fn default_cutoff_minute() -> u32 {
    20
}

fn default_utc_offset_hours() -> i32 {
    9
}

fn default_store_type() -> String {
    "memory".to_string()
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            cutoff_hour: default_cutoff_hour(),
            cutoff_minute: default_cutoff_minute(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_type: default_store_type(),
            root: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(StoreError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Configuration(format!("Failed to read config file: {e}")))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| StoreError::Configuration(format!("Failed to parse config file: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default search locations.
    ///
    /// Searches for `diffgrid.toml` in the current directory and its parent;
    /// falls back to all-defaults when nothing is found.
    pub fn from_default_location() -> Result<Self, StoreError> {
        let search_paths = [
            PathBuf::from("diffgrid.toml"),
            PathBuf::from("../diffgrid.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(AppConfig::default())
    }

    fn validate(&self) -> Result<(), StoreError> {
        if self.grid.window_size == 0 {
            return Err(StoreError::Configuration(
                "grid.window_size must be at least 1".to_string(),
            ));
        }
        if self.grid.cutoff_hour > 23 || self.grid.cutoff_minute > 59 {
            return Err(StoreError::Configuration(format!(
                "invalid rollover cutoff {:02}:{:02}",
                self.grid.cutoff_hour, self.grid.cutoff_minute
            )));
        }
        if self.grid.utc_offset_hours.abs() > 23 {
            return Err(StoreError::Configuration(format!(
                "invalid utc offset {}",
                self.grid.utc_offset_hours
            )));
        }
        Ok(())
    }
}
