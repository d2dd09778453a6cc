//! The canvas facade the shell talks to.

use crate::color::PaintColor;
use crate::compose::{CompositionGateway, ImageAnchor, Payload, TextBlock};
use crate::config::CanvasConfig;
use crate::error::CanvasResult;
use crate::history::History;
use crate::input::{DropPayload, PointerEvent};
use crate::raster::{RasterImage, RasterSurface, Snapshot};
use crate::stroke::StrokeEngine;
use crate::text::{BlockFont, GlyphRasterizer, paragraphs};
use image::RgbaImage;
use kurbo::Point;

/// A whiteboard canvas: one surface, its history, the stroke engine and
/// the composition gateway.
///
/// Every completed interaction (stroke release, insertion, clear) is one
/// undo step. An unfinished gesture is committed before any other
/// operation touches the surface.
pub struct Canvas {
    surface: RasterSurface,
    history: History,
    strokes: StrokeEngine,
    gateway: CompositionGateway,
    font: Box<dyn GlyphRasterizer>,
    config: CanvasConfig,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .field("strokes", &self.strokes)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create a blank canvas that renders text with [`BlockFont`].
    pub fn new(config: CanvasConfig) -> CanvasResult<Self> {
        Self::with_font(config, BlockFont::default())
    }

    /// Create a blank canvas with a shell-supplied font.
    pub fn with_font(
        config: CanvasConfig,
        font: impl GlyphRasterizer + 'static,
    ) -> CanvasResult<Self> {
        config.validate()?;
        let mut surface = RasterSurface::new(config.width, config.height, config.background)?;
        surface.set_stroke_color(config.stroke_color);
        surface.set_stroke_width(config.stroke_width);
        let history = History::new(&mut surface, config.history_limit);
        log::info!("Created {}x{} canvas", config.width, config.height);

        Ok(Self {
            surface,
            history,
            strokes: StrokeEngine::new(),
            gateway: CompositionGateway::new(config.placeholder.clone()),
            font: Box::new(font),
            config,
        })
    }

    /// Replace the font used for inserted text and placeholder labels.
    pub fn set_font(&mut self, font: impl GlyphRasterizer + 'static) {
        self.font = Box::new(font);
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // --- Pointer gestures ---

    /// Pointer pressed at `(x, y)`; `shift` selects straight-line mode.
    pub fn press(&mut self, x: f64, y: f64, shift: bool) {
        self.strokes
            .press(&mut self.surface, &mut self.history, Point::new(x, y), shift);
    }

    /// Pointer dragged to `(x, y)`. Returns false without an active gesture.
    pub fn move_to(&mut self, x: f64, y: f64, shift: bool) -> bool {
        self.strokes
            .move_to(&mut self.surface, &self.history, Point::new(x, y), shift)
    }

    /// Pointer released. Returns false without an active gesture.
    pub fn release(&mut self) -> bool {
        self.strokes.release(&mut self.surface, &mut self.history)
    }

    /// Dispatch a pointer event. Returns whether it changed any state.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Press { position, modifiers } => {
                self.press(position.x, position.y, modifiers.straight_line());
                true
            }
            PointerEvent::Move { position, modifiers } => {
                self.move_to(position.x, position.y, modifiers.straight_line())
            }
            PointerEvent::Release => self.release(),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.strokes.is_active()
    }

    // --- Paint attributes (effective from the next press) ---

    pub fn set_color(&mut self, color: PaintColor) {
        self.surface.set_stroke_color(color);
    }

    pub fn color(&self) -> PaintColor {
        self.surface.stroke_style().color
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.surface.set_stroke_width(width);
    }

    pub fn stroke_width(&self) -> f64 {
        self.surface.stroke_style().width
    }

    pub fn set_eraser(&mut self, eraser: bool) {
        self.strokes.set_eraser(eraser);
    }

    pub fn toggle_eraser(&mut self) {
        self.strokes.toggle_eraser();
    }

    pub fn is_eraser(&self) -> bool {
        self.strokes.is_eraser()
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        self.commit_pending();
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> bool {
        self.commit_pending();
        self.history.redo(&mut self.surface)
    }

    /// Wipe the canvas and its history down to a single blank state.
    pub fn clear(&mut self) {
        if self.strokes.is_active() {
            log::debug!("Clear during a gesture, dropping it");
            self.strokes.discard();
        }
        self.history.clear(&mut self.surface);
        log::info!("Canvas cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // --- Composition ---

    /// Composite an image at `(x, y)` using `anchor`.
    pub fn insert_image(&mut self, image: &RasterImage, x: f64, y: f64, anchor: ImageAnchor) {
        self.commit_pending();
        self.gateway
            .insert_image(&mut self.surface, &mut self.history, image, Point::new(x, y), anchor);
    }

    /// Insert text typed by the user, sized from the current stroke width
    /// and wrapped before the right margin.
    ///
    /// Returns the y coordinate where a following paragraph would start.
    pub fn insert_text(&mut self, text: &str, x: f64, y: f64) -> f64 {
        let font_size = self.config.text.font_size(self.stroke_width());
        let max_width = self.surface.width() as f64 - x - self.config.text.right_margin;
        self.insert_paragraphs(&paragraphs(text), x, y, font_size, max_width)
    }

    /// Insert text at the configured default origin.
    pub fn insert_text_at_default(&mut self, text: &str) -> f64 {
        let origin = self.config.text.default_origin;
        self.insert_text(text, origin.x, origin.y)
    }

    /// Insert pre-split paragraphs with an explicit font size and wrap width.
    pub fn insert_paragraphs<S: AsRef<str>>(
        &mut self,
        paragraphs: &[S],
        x: f64,
        y: f64,
        font_size: f64,
        max_width: f64,
    ) -> f64 {
        self.commit_pending();
        let block = TextBlock {
            paragraphs: paragraphs.iter().map(|p| p.as_ref().to_string()).collect(),
            font_size,
            line_height: font_size * self.config.text.line_height_ratio(),
            max_width,
            color: self.color(),
        };
        self.gateway.insert_text(
            &mut self.surface,
            &mut self.history,
            &block,
            Point::new(x, y),
            self.font.as_ref(),
        )
    }

    /// Draw a labelled placeholder for dropped video or audio.
    pub fn insert_media_placeholder(&mut self, label: &str, x: f64, y: f64) {
        self.commit_pending();
        self.gateway.insert_media_placeholder(
            &mut self.surface,
            &mut self.history,
            label,
            Point::new(x, y),
            self.font.as_ref(),
        );
    }

    /// Composite a drop at `(x, y)`.
    pub fn drop_payload(&mut self, payload: DropPayload, x: f64, y: f64) {
        self.commit_pending();
        self.gateway.compose(
            &mut self.surface,
            &mut self.history,
            Payload::from(payload),
            Point::new(x, y),
            self.font.as_ref(),
        );
    }

    /// Decode a dragged image file and center it on `(x, y)`.
    ///
    /// Bytes that cannot be decoded leave the canvas untouched.
    pub fn drop_image_bytes(&mut self, data: &[u8], x: f64, y: f64) -> CanvasResult<()> {
        let image = match RasterImage::decode(data) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("Rejected drop at ({x}, {y}): {err}");
                return Err(err);
            }
        };
        self.drop_payload(DropPayload::DraggedImage(image), x, y);
        Ok(())
    }

    // --- Output ---

    /// Read-only pixels for rendering by the shell.
    pub fn buffer(&self) -> &RgbaImage {
        self.surface.pixels()
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// The most recently committed state.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.current()
    }

    fn commit_pending(&mut self) {
        if self.strokes.release(&mut self.surface, &mut self.history) {
            log::debug!("Committed an unreleased gesture");
        }
    }
}
