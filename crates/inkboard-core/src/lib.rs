//! Inkboard Core Library
//!
//! Raster canvas, stroke engine, snapshot history and compositing for the
//! Inkboard whiteboard. The window, toolbar and media panel live in the
//! shell, which forwards pointer events and decoded payloads to a
//! [`Canvas`].

pub mod canvas;
pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod raster;
pub mod stroke;
pub mod text;

pub use canvas::Canvas;
pub use color::PaintColor;
pub use compose::{CompositionGateway, ImageAnchor, Payload, TextBlock};
pub use config::{CanvasConfig, PlaceholderConfig, TextConfig};
pub use error::{CanvasError, CanvasResult};
pub use history::History;
pub use input::{DragToken, DropPayload, MediaKind, Modifiers, PointerEvent};
pub use raster::{ImageFormat, RasterImage, RasterSurface, Snapshot, StrokeStyle};
pub use stroke::{StrokeEngine, StrokeMode, StrokeSession, constrain_to_axis};
pub use text::{BlockFont, FontMetrics, GlyphRasterizer, TrueTypeFont};
