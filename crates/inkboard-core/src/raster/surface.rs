//! The fixed-size pixel buffer every canvas operation draws into.

use super::{RasterImage, Snapshot, blend_pixel};
use crate::color::PaintColor;
use crate::error::{CanvasError, CanvasResult};
use crate::text::{GlyphRasterizer, wrap_paragraph};
use image::{Rgba, RgbaImage};
use kurbo::{ParamCurve, Point, QuadBez, Rect};

/// Chord length used when flattening curves, in pixels.
const FLATTEN_STEP: f64 = 2.0;
/// Upper bound on chords per curve segment.
const MAX_CHORDS: usize = 256;

/// Ink applied by stroke primitives. Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: PaintColor,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: PaintColor, width: f64) -> Self {
        Self { color, width }
    }

    fn radius(&self) -> f64 {
        self.width.max(0.0) / 2.0
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(PaintColor::BLACK, 3.0)
    }
}

/// An RGBA pixel buffer with drawing primitives.
///
/// All coordinates are surface-local. A pixel `(x, y)` is sampled at its
/// center, and every primitive clips to the buffer bounds.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    buffer: RgbaImage,
    background: PaintColor,
    style: StrokeStyle,
}

impl RasterSurface {
    /// Create a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: PaintColor) -> CanvasResult<Self> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        Ok(Self {
            buffer: RgbaImage::from_pixel(width, height, Rgba(background.to_array())),
            background,
            style: StrokeStyle::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64)
    }

    pub fn background(&self) -> PaintColor {
        self.background
    }

    /// Current paint attributes.
    pub fn stroke_style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_stroke_color(&mut self, color: PaintColor) {
        self.style.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.width = width.max(0.0);
    }

    /// Read-only view of the pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PaintColor> {
        self.buffer.get_pixel_checked(x, y).map(|px| PaintColor::from(px.0))
    }

    /// Fill the whole buffer.
    pub fn clear(&mut self, fill: PaintColor) {
        let px = Rgba(fill.to_array());
        for dst in self.buffer.pixels_mut() {
            *dst = px;
        }
    }

    /// Stroke a single segment. A zero-length segment paints a round dot.
    pub fn stroke_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        self.stroke_polyline(&[from, to], style);
    }

    /// Stroke connected segments in one coverage pass, so joints are
    /// blended once.
    pub fn stroke_polyline(&mut self, points: &[Point], style: &StrokeStyle) {
        let Some(&first) = points.first() else {
            return;
        };
        let radius = style.radius();
        let reach = radius + 1.0;

        let mut area = Rect::from_points(first, first);
        for &p in points {
            area = area.union_pt(p);
        }
        let Some((x0, y0, x1, y1)) = self.pixel_span(area.inflate(reach, reach)) else {
            return;
        };

        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(first, first)]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let dist = segments
                    .iter()
                    .map(|&(a, b)| segment_distance(center, a, b))
                    .fold(f64::INFINITY, f64::min);
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0) as f32;
                if coverage > 0.0 {
                    blend_pixel(self.buffer.get_pixel_mut(x, y), style.color, coverage);
                }
            }
        }
    }

    /// Stroke a quadratic Bézier by flattening it into short chords.
    pub fn stroke_quad(&mut self, from: Point, control: Point, to: Point, style: &StrokeStyle) {
        let curve = QuadBez::new(from, control, to);
        let hull = from.distance(control) + control.distance(to);
        let chords = ((hull / FLATTEN_STEP).ceil() as usize).clamp(1, MAX_CHORDS);
        let points: Vec<Point> = (0..=chords)
            .map(|i| curve.eval(i as f64 / chords as f64))
            .collect();
        self.stroke_polyline(&points, style);
    }

    /// Fill the pixels whose centers lie inside `rect`.
    pub fn fill_rect(&mut self, rect: Rect, color: PaintColor) {
        let rect = rect.abs();
        let x0 = (rect.x0 - 0.5).ceil().max(0.0) as u32;
        let y0 = (rect.y0 - 0.5).ceil().max(0.0) as u32;
        let x1 = (rect.x1 - 0.5).ceil().clamp(0.0, self.width() as f64) as u32;
        let y1 = (rect.y1 - 0.5).ceil().clamp(0.0, self.height() as f64) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                blend_pixel(self.buffer.get_pixel_mut(x, y), color, 1.0);
            }
        }
    }

    /// Composite `image` with its top-left corner at `(x, y)`. No scaling.
    pub fn blit_image(&mut self, image: &RasterImage, x: f64, y: f64) {
        self.composite(image.pixels(), x.round() as i64, y.round() as i64, true);
    }

    /// Draw one paragraph, word-wrapped to `max_width`, with its first
    /// baseline at `origin`.
    ///
    /// Returns the running y cursor after the paragraph (the baseline of
    /// its last line), so callers can stack paragraphs.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_text(
        &mut self,
        paragraph: &str,
        origin: Point,
        line_height: f64,
        max_width: f64,
        color: PaintColor,
        font_size: f64,
        font: &dyn GlyphRasterizer,
    ) -> f64 {
        let layout = wrap_paragraph(paragraph, origin.y, line_height, max_width, font_size, font);
        for line in &layout.lines {
            let baseline = Point::new(origin.x, line.baseline);
            self.draw_text_line(&line.text, baseline, color, font_size, font);
        }
        layout.end_y
    }

    /// Draw a single unwrapped line with its baseline at `origin`.
    pub fn draw_text_line(
        &mut self,
        text: &str,
        origin: Point,
        color: PaintColor,
        font_size: f64,
        font: &dyn GlyphRasterizer,
    ) {
        let (width, height) = (self.width() as i64, self.height() as i64);
        let clip = self.bounds();
        let buffer = &mut self.buffer;
        font.rasterize(text, font_size, origin, clip, &mut |x, y, coverage| {
            if (0..width).contains(&x) && (0..height).contains(&y) {
                blend_pixel(buffer.get_pixel_mut(x as u32, y as u32), color, coverage);
            }
        });
    }

    /// Deep copy of the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.buffer)
    }

    /// Replace the buffer with `snapshot`: clear to the background, then
    /// copy the snapshot over it.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.clear(self.background);
        self.composite(snapshot.pixels(), 0, 0, false);
    }

    /// Copy or blend `src` at an integer offset, clipped to the buffer.
    fn composite(&mut self, src: &RgbaImage, ox: i64, oy: i64, blend: bool) {
        let (dw, dh) = (self.width() as i64, self.height() as i64);
        let x_start = ox.max(0);
        let y_start = oy.max(0);
        // Offsets come from arbitrary f64 drop points and may sit at the i64 limits.
        let x_end = ox.saturating_add(src.width() as i64).min(dw);
        let y_end = oy.saturating_add(src.height() as i64).min(dh);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let px = *src.get_pixel((x - ox) as u32, (y - oy) as u32);
                let dst = self.buffer.get_pixel_mut(x as u32, y as u32);
                if blend {
                    blend_pixel(dst, PaintColor::from(px.0), 1.0);
                } else {
                    *dst = px;
                }
            }
        }
    }

    /// Integer pixel range covered by `area`, clipped to the buffer.
    fn pixel_span(&self, area: Rect) -> Option<(u32, u32, u32, u32)> {
        let clipped = area.intersect(self.bounds());
        if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
            return None;
        }
        Some((
            clipped.x0.floor() as u32,
            clipped.y0.floor() as u32,
            (clipped.x1.ceil() as u32).min(self.width()),
            (clipped.y1.ceil() as u32).min(self.height()),
        ))
    }
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let line_vec = b - a;
    let point_vec = p - a;
    let line_len_sq = line_vec.hypot2();
    if line_len_sq < f64::EPSILON {
        return point_vec.hypot();
    }
    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    p.distance(a + line_vec * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BlockFont;

    fn surface() -> RasterSurface {
        RasterSurface::new(100, 60, PaintColor::WHITE).unwrap()
    }

    fn ink() -> StrokeStyle {
        StrokeStyle::new(PaintColor::BLACK, 3.0)
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            RasterSurface::new(0, 10, PaintColor::WHITE),
            Err(CanvasError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut s = surface();
        s.clear(PaintColor::rgb(1, 2, 3));
        assert!(s.pixels().pixels().all(|px| px.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn test_segment_paints_line() {
        let mut s = surface();
        s.stroke_segment(Point::new(10.0, 10.0), Point::new(50.0, 10.0), &ink());
        assert_eq!(s.pixel(30, 10), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(30, 9), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(30, 13), Some(PaintColor::WHITE));
        // Round cap extends past the endpoint.
        assert_eq!(s.pixel(50, 10), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(53, 10), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_zero_length_segment_is_dot() {
        let mut s = surface();
        s.stroke_segment(Point::new(20.0, 20.0), Point::new(20.0, 20.0), &ink());
        assert_eq!(s.pixel(20, 20), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(19, 19), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(25, 20), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_strokes_clip_to_bounds() {
        let mut s = surface();
        s.stroke_segment(Point::new(-50.0, -50.0), Point::new(500.0, 500.0), &ink());
        s.stroke_segment(Point::new(-50.0, -50.0), Point::new(-40.0, -40.0), &ink());
        assert_eq!(s.pixel(30, 30), Some(PaintColor::BLACK));
    }

    #[test]
    fn test_quad_reaches_endpoints() {
        let mut s = surface();
        s.stroke_quad(
            Point::new(10.0, 40.0),
            Point::new(40.0, 0.0),
            Point::new(70.0, 40.0),
            &ink(),
        );
        assert_eq!(s.pixel(10, 40), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(70, 40), Some(PaintColor::BLACK));
        // Apex of the curve is at y = 20.
        assert_eq!(s.pixel(40, 20), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(40, 40), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut s = surface();
        s.fill_rect(Rect::new(90.0, 50.0, 150.0, 90.0), PaintColor::LIGHT_GRAY);
        assert_eq!(s.pixel(99, 59), Some(PaintColor::LIGHT_GRAY));
        assert_eq!(s.pixel(89, 59), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_blit_clips_negative_origin() {
        let mut s = surface();
        let red = PaintColor::rgb(255, 0, 0);
        let image = RasterImage::from(RgbaImage::from_pixel(10, 10, Rgba(red.to_array())));
        s.blit_image(&image, -5.0, -5.0);
        assert_eq!(s.pixel(0, 0), Some(red));
        assert_eq!(s.pixel(4, 4), Some(red));
        assert_eq!(s.pixel(5, 5), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_blit_far_offsets_are_clipped() {
        let mut s = surface();
        let image = RasterImage::from(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let before = s.snapshot();
        let far = [
            (1e30, 1e30),
            (-1e30, -1e30),
            (1e30, 0.0),
            (f64::INFINITY, f64::NEG_INFINITY),
        ];
        for (x, y) in far {
            s.blit_image(&image, x, y);
        }
        assert_eq!(s.pixels(), before.pixels());
    }

    #[test]
    fn test_blit_respects_alpha() {
        let mut s = surface();
        let image = RasterImage::from(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        s.blit_image(&image, 0.0, 0.0);
        assert_eq!(s.pixel(0, 0), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let mut s = surface();
        let before = s.snapshot();
        s.stroke_segment(Point::new(10.0, 10.0), Point::new(20.0, 10.0), &ink());
        assert_eq!(before.pixel(15, 10), Some(PaintColor::WHITE));
        assert_eq!(s.pixel(15, 10), Some(PaintColor::BLACK));

        s.restore(&before);
        assert_eq!(s.pixels(), before.pixels());
    }

    #[test]
    fn test_fill_text_returns_last_baseline() {
        let mut s = surface();
        let font = BlockFont::default();
        // 10px font: 5px per char, "aaaa bbbb" is 45px wide.
        let origin = Point::new(0.0, 20.0);
        let end = s.fill_text("aaaa bbbb", origin, 16.0, 30.0, PaintColor::BLACK, 10.0, &font);
        assert_eq!(end, 36.0);
        assert_eq!(s.pixel(2, 15), Some(PaintColor::BLACK));
        assert_eq!(s.pixel(2, 31), Some(PaintColor::BLACK));
    }

    #[test]
    fn test_text_outside_bounds_is_clipped() {
        let mut s = surface();
        let font = BlockFont::default();
        s.draw_text_line("abc", Point::new(95.0, 5.0), PaintColor::BLACK, 10.0, &font);
        s.draw_text_line("abc", Point::new(-200.0, -200.0), PaintColor::BLACK, 10.0, &font);
        assert_eq!(s.pixel(96, 1), Some(PaintColor::BLACK));
    }
}
