//! Compositing of externally supplied images, text and media onto the
//! canvas. Every insertion is recorded as one history step.

use crate::color::PaintColor;
use crate::config::PlaceholderConfig;
use crate::history::History;
use crate::input::DropPayload;
use crate::raster::{RasterImage, RasterSurface};
use crate::text::{GlyphRasterizer, PARAGRAPH_SPACING};
use kurbo::{Point, Rect, Vec2};

/// Where an inserted image is placed relative to the target point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAnchor {
    /// Image centered on the point (images dragged onto the canvas).
    Center,
    /// Top-left corner at the point (images placed from the side panel).
    #[default]
    TopLeft,
}

impl ImageAnchor {
    /// Top-left corner for an image of `size` anchored at `at`.
    pub fn origin(self, at: Point, width: u32, height: u32) -> Point {
        match self {
            ImageAnchor::Center => at - Vec2::new(width as f64 / 2.0, height as f64 / 2.0),
            ImageAnchor::TopLeft => at,
        }
    }
}

/// Text block ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub paragraphs: Vec<String>,
    pub font_size: f64,
    pub line_height: f64,
    pub max_width: f64,
    pub color: PaintColor,
}

/// A visual payload consumed once by [`CompositionGateway::compose`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Image { image: RasterImage, anchor: ImageAnchor },
    Text(TextBlock),
    Placeholder { label: String },
}

impl From<DropPayload> for Payload {
    fn from(payload: DropPayload) -> Self {
        match payload {
            DropPayload::DraggedImage(image) => Payload::Image {
                image,
                anchor: ImageAnchor::Center,
            },
            DropPayload::PanelImage(image) => Payload::Image {
                image,
                anchor: ImageAnchor::TopLeft,
            },
            DropPayload::Media { label, .. } => Payload::Placeholder { label },
        }
    }
}

/// Composites payloads onto a surface and records the result.
#[derive(Debug, Clone, Default)]
pub struct CompositionGateway {
    placeholder: PlaceholderConfig,
}

impl CompositionGateway {
    pub fn new(placeholder: PlaceholderConfig) -> Self {
        Self { placeholder }
    }

    pub fn placeholder(&self) -> &PlaceholderConfig {
        &self.placeholder
    }

    /// Route a payload to the matching insertion.
    ///
    /// Text payloads return the y where a following paragraph would start.
    pub fn compose(
        &self,
        surface: &mut RasterSurface,
        history: &mut History,
        payload: Payload,
        at: Point,
        font: &dyn GlyphRasterizer,
    ) -> Option<f64> {
        match payload {
            Payload::Image { image, anchor } => {
                self.insert_image(surface, history, &image, at, anchor);
                None
            }
            Payload::Text(block) => Some(self.insert_text(surface, history, &block, at, font)),
            Payload::Placeholder { label } => {
                self.insert_media_placeholder(surface, history, &label, at, font);
                None
            }
        }
    }

    /// Blit `image` unscaled and record the result.
    pub fn insert_image(
        &self,
        surface: &mut RasterSurface,
        history: &mut History,
        image: &RasterImage,
        at: Point,
        anchor: ImageAnchor,
    ) {
        let origin = anchor.origin(at, image.width(), image.height());
        surface.blit_image(image, origin.x, origin.y);
        history.push(surface.snapshot());
        log::debug!(
            "Inserted {}x{} image at {:?} ({:?})",
            image.width(),
            image.height(),
            origin,
            anchor
        );
    }

    /// Draw word-wrapped paragraphs from `origin` and record the result.
    ///
    /// Returns the y coordinate where a following paragraph would start.
    pub fn insert_text(
        &self,
        surface: &mut RasterSurface,
        history: &mut History,
        block: &TextBlock,
        origin: Point,
        font: &dyn GlyphRasterizer,
    ) -> f64 {
        let mut y = origin.y;
        for paragraph in &block.paragraphs {
            let end_y = surface.fill_text(
                paragraph,
                Point::new(origin.x, y),
                block.line_height,
                block.max_width,
                block.color,
                block.font_size,
                font,
            );
            y = end_y + block.line_height * PARAGRAPH_SPACING;
        }
        history.push(surface.snapshot());
        log::debug!("Inserted {} paragraph(s) at {:?}", block.paragraphs.len(), origin);
        y
    }

    /// Draw the symbolic rectangle for a video or audio item.
    pub fn insert_media_placeholder(
        &self,
        surface: &mut RasterSurface,
        history: &mut History,
        label: &str,
        at: Point,
        font: &dyn GlyphRasterizer,
    ) {
        let cfg = &self.placeholder;
        let rect = Rect::from_origin_size(at, (cfg.width, cfg.height));
        surface.fill_rect(rect, cfg.fill);
        surface.draw_text_line(label, at + cfg.label_offset, cfg.label_color, cfg.font_size, font);
        history.push(surface.snapshot());
        log::debug!("Inserted media placeholder {label:?} at {at:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BlockFont;
    use image::{Rgba, RgbaImage};

    fn setup() -> (RasterSurface, History, CompositionGateway) {
        let mut surface = RasterSurface::new(200, 100, PaintColor::WHITE).unwrap();
        let history = History::new(&mut surface, None);
        (surface, history, CompositionGateway::default())
    }

    fn red_square(size: u32) -> RasterImage {
        RasterImage::from(RgbaImage::from_pixel(size, size, Rgba([255, 0, 0, 255])))
    }

    const RED: PaintColor = PaintColor::rgb(255, 0, 0);

    #[test]
    fn test_anchor_origin() {
        let at = Point::new(50.0, 50.0);
        assert_eq!(ImageAnchor::Center.origin(at, 20, 10), Point::new(40.0, 45.0));
        assert_eq!(ImageAnchor::TopLeft.origin(at, 20, 10), at);
    }

    #[test]
    fn test_centered_image() {
        let (mut surface, mut history, gateway) = setup();
        let at = Point::new(50.0, 50.0);
        gateway.insert_image(&mut surface, &mut history, &red_square(10), at, ImageAnchor::Center);
        assert_eq!(surface.pixel(45, 45), Some(RED));
        assert_eq!(surface.pixel(54, 54), Some(RED));
        assert_eq!(surface.pixel(55, 55), Some(PaintColor::WHITE));
        assert_eq!(surface.pixel(44, 44), Some(PaintColor::WHITE));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_top_left_image() {
        let (mut surface, mut history, gateway) = setup();
        let at = Point::new(50.0, 50.0);
        gateway.insert_image(&mut surface, &mut history, &red_square(10), at, ImageAnchor::TopLeft);
        assert_eq!(surface.pixel(50, 50), Some(RED));
        assert_eq!(surface.pixel(59, 59), Some(RED));
        assert_eq!(surface.pixel(49, 49), Some(PaintColor::WHITE));
    }

    #[test]
    fn test_image_partially_outside() {
        let (mut surface, mut history, gateway) = setup();
        let at = Point::new(198.0, 98.0);
        gateway.insert_image(&mut surface, &mut history, &red_square(10), at, ImageAnchor::TopLeft);
        assert_eq!(surface.pixel(199, 99), Some(RED));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_image_far_off_canvas() {
        let (mut surface, mut history, gateway) = setup();
        let at = Point::new(1e30, 1e30);
        gateway.insert_image(&mut surface, &mut history, &red_square(10), at, ImageAnchor::Center);
        assert!(surface.pixels().pixels().all(|px| px.0 == [255, 255, 255, 255]));
        // Still one recorded step, like any other drop.
        assert_eq!(history.undo_depth(), 1);
    }

    fn two_paragraphs() -> TextBlock {
        TextBlock {
            paragraphs: vec!["ab cd".into(), "ef".into()],
            font_size: 10.0,
            line_height: 16.0,
            max_width: 100.0,
            color: PaintColor::BLACK,
        }
    }

    #[test]
    fn test_insert_text_one_snapshot() {
        let (mut surface, mut history, gateway) = setup();
        let font = BlockFont::default();
        let at = Point::new(10.0, 20.0);
        let next = gateway.insert_text(&mut surface, &mut history, &two_paragraphs(), at, &font);
        assert_eq!(history.undo_depth(), 1);
        // First paragraph at 20, second at 20 + 24.
        assert_eq!(surface.pixel(12, 15), Some(PaintColor::BLACK));
        assert_eq!(surface.pixel(12, 40), Some(PaintColor::BLACK));
        assert!((next - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder() {
        let (mut surface, mut history, gateway) = setup();
        let font = BlockFont::default();
        let at = Point::new(20.0, 20.0);
        gateway.insert_media_placeholder(&mut surface, &mut history, "song.mp3", at, &font);
        assert_eq!(surface.pixel(20, 20), Some(PaintColor::LIGHT_GRAY));
        assert_eq!(surface.pixel(169, 59), Some(PaintColor::LIGHT_GRAY));
        assert_eq!(surface.pixel(170, 20), Some(PaintColor::WHITE));
        // Label cell for the first glyph starts at x = 25 + 0.6.
        assert_eq!(surface.pixel(27, 38), Some(PaintColor::BLACK));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_compose_routes_drop() {
        let (mut surface, mut history, gateway) = setup();
        let font = BlockFont::default();
        let payload = Payload::from(DropPayload::DraggedImage(red_square(4)));
        let at = Point::new(10.0, 10.0);
        let next = gateway.compose(&mut surface, &mut history, payload, at, &font);
        assert_eq!(next, None);
        assert_eq!(surface.pixel(8, 8), Some(RED));
        assert_eq!(surface.pixel(7, 7), Some(PaintColor::WHITE));
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_compose_text_returns_next_y() {
        let (mut surface, mut history, gateway) = setup();
        let font = BlockFont::default();
        let payload = Payload::Text(two_paragraphs());
        let at = Point::new(10.0, 20.0);
        let next = gateway.compose(&mut surface, &mut history, payload, at, &font);
        assert!(next.is_some_and(|y| (y - 68.0).abs() < 1e-9));
        assert_eq!(surface.pixel(12, 40), Some(PaintColor::BLACK));
        assert_eq!(history.undo_depth(), 1);
    }
}
