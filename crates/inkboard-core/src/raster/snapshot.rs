//! Immutable canvas snapshots.

use crate::color::PaintColor;
use image::RgbaImage;
use std::sync::Arc;

/// A full copy of the surface pixels at one instant.
///
/// Cloning shares the pixel data; nothing can mutate it after capture.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pixels: Arc<RgbaImage>,
}

impl Snapshot {
    pub(crate) fn capture(pixels: &RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels.clone()),
        }
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

    pub fn pixel(&self, x: u32, y: u32) -> Option<PaintColor> {
        self.pixels.get_pixel_checked(x, y).map(|px| PaintColor::from(px.0))
    }

    /// Whether two snapshots share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.pixels == *other.pixels
    }
}

impl Eq for Snapshot {}
