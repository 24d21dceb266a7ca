//! Editor configuration, loaded from JSON.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::settings::{
    BrushSettings, BucketSettings, PencilSettings, PlumeSettings, RectangleSettings, SpraySettings,
};

pub const DEFAULT_CANVAS_WIDTH: usize = 1000;
pub const DEFAULT_CANVAS_HEIGHT: usize = 800;
pub const MIN_CANVAS_SIZE: usize = 250;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    /// Smallest side a resize may produce
    pub min_size: usize,
    pub background: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            min_size: MIN_CANVAS_SIZE,
            background: Color::WHITE,
        }
    }
}

/// Initial parameters of every tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefaults {
    pub primary: Color,
    pub secondary: Color,
    pub pencil: PencilSettings,
    pub brush: BrushSettings,
    pub plume: PlumeSettings,
    pub spray: SpraySettings,
    pub rectangle: RectangleSettings,
    pub bucket: BucketSettings,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            primary: Color::BLACK,
            secondary: Color::BLACK,
            pencil: PencilSettings::default(),
            brush: BrushSettings::default(),
            plume: PlumeSettings::default(),
            spray: SpraySettings::default(),
            rectangle: RectangleSettings::default(),
            bucket: BucketSettings::default(),
        }
    }
}

impl ToolDefaults {
    /// Push the shared colors into each tool's own settings
    pub fn with_colors_applied(mut self) -> Self {
        self.pencil.color = self.primary;
        self.brush.color = self.primary;
        self.plume.color = self.primary;
        self.spray.color = self.primary;
        self.rectangle.primary = self.primary;
        self.rectangle.secondary = self.secondary;
        self.bucket.color = self.primary;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old configs
pub struct EditorConfig {
    pub canvas: CanvasConfig,
    pub tools: ToolDefaults,
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;
        if canvas.min_size == 0 {
            return Err(ConfigError::Invalid("minimum canvas size must be positive".into()));
        }
        if canvas.width < canvas.min_size || canvas.height < canvas.min_size {
            return Err(ConfigError::Invalid(format!(
                "canvas {}x{} is smaller than the minimum side {}",
                canvas.width, canvas.height, canvas.min_size
            )));
        }

        let tools = &self.tools;
        if !(tools.spray.frequency_hz.is_finite() && tools.spray.frequency_hz > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spray frequency must be positive, got {}",
                tools.spray.frequency_hz
            )));
        }

        let lengths = [
            ("pencil line width", tools.pencil.line_width),
            ("brush line width", tools.brush.line_width),
            ("plume line width", tools.plume.line_width),
            ("plume line length", tools.plume.line_length),
            ("rectangle line width", tools.rectangle.line_width),
            ("spray radius", tools.spray.radius),
            ("droplet radius", tools.spray.droplet_radius),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}
