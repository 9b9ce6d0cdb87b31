//! Pad configuration.

use crate::color::InkColor;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A pen preset offered in the tool palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPreset {
    pub name: String,
    pub thickness: f64,
    #[serde(default)]
    pub color: InkColor,
}

/// Settings shared by the controller, the renderers and the app shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadConfig {
    /// Side length of the square drawing canvas, in pixels.
    pub canvas_size: u32,
    pub background: InkColor,
    /// Font size stamps are placed with.
    pub stamp_font_size: f64,
    /// Global alpha of the cursor preview.
    pub preview_opacity: f64,
    /// Side length of exported images, in pixels.
    pub export_size: u32,
    pub markers: Vec<MarkerPreset>,
    pub stickers: Vec<String>,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            canvas_size: 256,
            background: InkColor::rgb(0xf0, 0xf0, 0xf0),
            stamp_font_size: 32.0,
            preview_opacity: 0.5,
            export_size: 1024,
            markers: vec![
                MarkerPreset {
                    name: "Thin".to_string(),
                    thickness: 3.0,
                    color: InkColor::BLACK,
                },
                MarkerPreset {
                    name: "Thick".to_string(),
                    thickness: 10.0,
                    color: InkColor::BLACK,
                },
            ],
            stickers: vec!["⭐".to_string(), "🔥".to_string(), "🎈".to_string()],
        }
    }
}

impl PadConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at the default location, falling back to defaults
    /// when no file exists there.
    pub fn load_or_default() -> ConfigResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config location.
    ///
    /// On Unix: `~/.config/sketchpad/config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sketchpad").join("config.json"))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Check value ranges and presets.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.canvas_size == 0 {
            return Err(ConfigError::Invalid("canvas_size must be positive".to_string()));
        }
        if self.export_size == 0 {
            return Err(ConfigError::Invalid("export_size must be positive".to_string()));
        }
        if !self.stamp_font_size.is_finite() || self.stamp_font_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "stamp_font_size must be positive, got {}",
                self.stamp_font_size
            )));
        }
        if !(self.preview_opacity > 0.0 && self.preview_opacity <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "preview_opacity must be in (0, 1], got {}",
                self.preview_opacity
            )));
        }
        for marker in &self.markers {
            Tool::pen(marker.thickness, marker.color)
                .map_err(|e| ConfigError::Invalid(format!("marker '{}': {}", marker.name, e)))?;
        }
        for glyph in &self.stickers {
            Tool::sticker(glyph).map_err(|e| ConfigError::Invalid(format!("sticker: {}", e)))?;
        }
        Ok(())
    }
}
