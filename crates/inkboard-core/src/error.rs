//! Error types for canvas construction and payload decoding.

use thiserror::Error;

/// Errors raised by the canvas core.
///
/// Drawing and history operations never fail; only the boundaries that
/// accept external data (dimensions, image bytes, fonts, drag tokens,
/// configuration) can report an error.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Unsupported image format")]
    UnsupportedImageFormat,
    #[error("Image buffer has {actual} bytes, expected {expected}")]
    InvalidImageBuffer { expected: usize, actual: usize },
    #[error("Invalid font: {0}")]
    InvalidFont(String),
    #[error("Invalid drag token: {0}")]
    InvalidDragToken(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;
