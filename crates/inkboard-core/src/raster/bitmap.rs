//! Decoded bitmaps supplied by the shell.

use crate::error::{CanvasError, CanvasResult};
use image::RgbaImage;

/// Encoded formats accepted for dropped files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageFormat {
    /// Identify a file from its leading signature bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data {
            [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(ImageFormat::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageFormat::WebP)
            }
            _ => None,
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// A decoded RGBA image ready to be composited onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Wrap straight (non-premultiplied) RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> CanvasResult<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .map(|pixels| Self { pixels })
            .ok_or(CanvasError::InvalidImageBuffer { expected, actual })
    }

    /// Decode PNG, JPEG, GIF or WebP file bytes. Animated GIFs yield
    /// their first frame.
    pub fn decode(data: &[u8]) -> CanvasResult<Self> {
        let format = ImageFormat::detect(data).ok_or(CanvasError::UnsupportedImageFormat)?;
        let decoded = image::load_from_memory_with_format(data, format.into())?;
        log::debug!(
            "Decoded {:?} image {}x{}",
            format,
            decoded.width(),
            decoded.height()
        );
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}
