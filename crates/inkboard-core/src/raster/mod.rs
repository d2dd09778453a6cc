//! Raster surface, snapshots and decoded bitmaps.

mod bitmap;
mod snapshot;
mod surface;

pub use bitmap::{ImageFormat, RasterImage};
pub use snapshot::Snapshot;
pub use surface::{RasterSurface, StrokeStyle};

use crate::color::PaintColor;
use image::Rgba;

/// Source-over blend of `color` into `dst`, scaled by `coverage`.
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, color: PaintColor, coverage: f32) {
    let alpha = color.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    if alpha >= 1.0 {
        *dst = Rgba(color.to_array());
        return;
    }

    let src = [color.r, color.g, color.b];
    for (channel, &s) in dst.0.iter_mut().take(3).zip(src.iter()) {
        let blended = s as f32 * alpha + *channel as f32 * (1.0 - alpha);
        *channel = blended.round().clamp(0.0, 255.0) as u8;
    }
    let dst_alpha = dst.0[3] as f32 / 255.0;
    dst.0[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round().clamp(0.0, 255.0) as u8;
}
