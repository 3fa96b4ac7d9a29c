use std::path::PathBuf;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Load Error: {0}")]
    Load(#[from] LoadError),
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),
    #[error("Export Error: {0}")]
    Export(#[from] ExportError),
    #[error("Configuration Error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Image Load Error Type
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to decode image {0}: {1}")]
    Decode(PathBuf, image::ImageError),
    #[error("Image {0} has no pixels")]
    EmptyImage(PathBuf),
    #[error("Configured defaults are invalid for {0}: {1}")]
    InvalidDefaults(PathBuf, SessionError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No image is loaded.")]
    Unloaded,
    #[error("Lower threshold {lower} must be below upper threshold {upper}")]
    InvalidThreshold { lower: u8, upper: u8 },
    #[error("Radius must be at least 1, got {0}")]
    InvalidRadius(u32),
    #[error("Center ({x}, {y}) lies outside the {width}x{height} image")]
    CenterOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Failed to compress image data: {0}")]
    Compression(std::io::Error),
}
