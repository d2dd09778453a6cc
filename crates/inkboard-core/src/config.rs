//! Canvas configuration.

use crate::color::PaintColor;
use crate::error::{CanvasError, CanvasResult};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Settings applied when a canvas is created.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background color; also the eraser ink.
    pub background: PaintColor,
    /// Initial stroke color.
    pub stroke_color: PaintColor,
    /// Initial stroke width in pixels.
    pub stroke_width: f64,
    /// Maximum number of snapshots kept in the undo history (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Text insertion settings.
    pub text: TextConfig,
    /// Media placeholder settings.
    pub placeholder: PlaceholderConfig,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 950,
            height: 550,
            background: PaintColor::WHITE,
            stroke_color: PaintColor::BLACK,
            stroke_width: 3.0,
            history_limit: None,
            text: TextConfig::default(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the surface can actually be allocated.
    pub fn validate(&self) -> CanvasResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Sizing rules for inserted text, relative to the current stroke width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font size = stroke width × this ratio.
    pub font_ratio: f64,
    /// Line height = stroke width × this ratio.
    pub line_ratio: f64,
    /// Origin used when the shell does not pick a position.
    pub default_origin: Point,
    /// Gap kept between wrapped text and the right edge of the canvas.
    pub right_margin: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_ratio: 5.0,
            line_ratio: 8.0,
            default_origin: Point::new(50.0, 50.0),
            right_margin: 20.0,
        }
    }
}

impl TextConfig {
    pub fn font_size(&self, stroke_width: f64) -> f64 {
        stroke_width * self.font_ratio
    }

    /// Line height as a multiple of the font size.
    pub fn line_height_ratio(&self) -> f64 {
        if self.font_ratio > 0.0 {
            self.line_ratio / self.font_ratio
        } else {
            1.0
        }
    }
}

/// Look of the symbolic rectangle drawn for dropped video and audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub width: f64,
    pub height: f64,
    pub fill: PaintColor,
    pub label_color: PaintColor,
    /// Label baseline offset from the placeholder's top-left corner.
    pub label_offset: Vec2,
    pub font_size: f64,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 40.0,
            fill: PaintColor::LIGHT_GRAY,
            label_color: PaintColor::BLACK,
            label_offset: Vec2::new(5.0, 20.0),
            font_size: 12.0,
        }
    }
}
