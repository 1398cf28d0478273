//! Dashboard Configuration
//! Optional `geocluster.json` in the working directory; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "geocluster.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Map zoom must be between 0 and 20, got {0}")]
    InvalidZoom(u8),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window: WindowConfig,
    pub map: MapConfig,
    pub loader: LoaderConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
            min_width: 1000.0,
            min_height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Web-map style zoom level the view opens at.
    pub zoom: u8,
    pub point_radius: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 6,
            point_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Rows scanned to infer CSV column types.
    pub infer_schema_length: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            infer_schema_length: 10000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub png_width: u32,
    pub png_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            png_width: 1400,
            png_height: 1000,
        }
    }
}

impl DashboardConfig {
    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.map.zoom > 20 {
            return Err(ConfigError::InvalidZoom(self.map.zoom));
        }
        Ok(())
    }
}
