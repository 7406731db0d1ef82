use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParallaxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("No usable frames in {path}")]
    EmptySource { path: PathBuf },

    #[error("No sequence loaded")]
    NoSequence,

    #[error("Frame dimensions {actual_width}x{actual_height} do not match {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid viewport dimensions: {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Unsupported source format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ParallaxError>;
