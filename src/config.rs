use std::path::Path;

use serde::Deserialize;
use tracing::Level;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub window: WindowSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// Parameter defaults applied when an image is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub default_lower: u8,
    pub default_upper: u8,
    /// Initial radius is `min(width, height) / radius_divisor`.
    pub radius_divisor: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub extension: String,
    /// Side of each square document panel, in points.
    pub panel_size: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            default_lower: 0,
            default_upper: 140,
            radius_divisor: 3,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Pixelwolf".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            panel_size: 360.0,
            font_size: 10.0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path` when given, otherwise returns the defaults.
    /// Missing keys keep their default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        match path {
            Some(path) => ::config::Config::builder()
                .add_source(::config::File::from(path))
                .build()?
                .try_deserialize(),
            None => Ok(Self::default()),
        }
    }
}

impl LoggingSettings {
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}
