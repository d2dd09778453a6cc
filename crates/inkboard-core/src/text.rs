//! Font metrics, glyph rasterization and word-wrap layout.
//!
//! The core never loads fonts on its own. The shell injects a
//! [`GlyphRasterizer`]; [`BlockFont`] is used when none is supplied.

use crate::error::{CanvasError, CanvasResult};
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use kurbo::{Point, Rect};

/// Text width measurement.
pub trait FontMetrics {
    /// Advance width of `text` rendered at `font_size`.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// A font that can also produce pixel coverage.
pub trait GlyphRasterizer: FontMetrics {
    /// Rasterize a single line with its baseline starting at `origin`.
    ///
    /// `plot` receives device pixel coordinates and a coverage in `0..=1`.
    /// Pixels outside `clip` may be skipped.
    fn rasterize(
        &self,
        text: &str,
        font_size: f64,
        origin: Point,
        clip: Rect,
        plot: &mut dyn FnMut(i64, i64, f32),
    );
}

/// A committed line of wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub text: String,
    /// Baseline y coordinate.
    pub baseline: f64,
}

/// Result of wrapping a single paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    pub lines: Vec<LaidOutLine>,
    /// Running y cursor after the paragraph (baseline of its last line).
    pub end_y: f64,
}

/// Extra spacing between paragraphs, as a multiple of the line height.
pub const PARAGRAPH_SPACING: f64 = 1.5;

/// Greedily wrap one paragraph.
///
/// Words are appended while `current + " " + word` fits in `max_width`.
/// On overflow the current line is committed, the cursor advances by
/// `line_height` and the word starts a new line. A word that does not fit
/// even on an empty line is placed alone.
pub fn wrap_paragraph(
    paragraph: &str,
    start_y: f64,
    line_height: f64,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> ParagraphLayout {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut y = start_y;

    for word in paragraph.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if metrics.text_width(&candidate, font_size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(LaidOutLine {
                text: std::mem::take(&mut current),
                baseline: y,
            });
            y += line_height;
        }
        current = word.to_string();
    }

    if !current.is_empty() {
        lines.push(LaidOutLine {
            text: current,
            baseline: y,
        });
    }

    ParagraphLayout { lines, end_y: y }
}

/// Split text the shell received from its text entry into paragraphs.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Fallback font: fixed advance, each visible glyph drawn as a solid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockFont {
    /// Advance per character as a fraction of the font size.
    pub advance_ratio: f64,
    /// Cell height above the baseline as a fraction of the font size.
    pub ascent_ratio: f64,
}

impl Default for BlockFont {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            ascent_ratio: 0.7,
        }
    }
}

impl FontMetrics for BlockFont {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance_ratio
    }
}

impl GlyphRasterizer for BlockFont {
    fn rasterize(
        &self,
        text: &str,
        font_size: f64,
        origin: Point,
        clip: Rect,
        plot: &mut dyn FnMut(i64, i64, f32),
    ) {
        let (clip_x0, clip_x1) = (clip.x0.floor() as i64, clip.x1.ceil() as i64);
        let advance = font_size * self.advance_ratio;
        let top = (origin.y - font_size * self.ascent_ratio).round() as i64;
        let top = top.max(clip.y0.floor() as i64);
        let bottom = (origin.y.round() as i64).min(clip.y1.ceil() as i64);
        if top >= bottom {
            return;
        }

        for (i, ch) in text.chars().enumerate() {
            let left = origin.x + i as f64 * advance;
            if left >= clip.x1 {
                break;
            }
            if ch.is_whitespace() {
                continue;
            }
            let x0 = ((left + advance * 0.1).round() as i64).max(clip_x0);
            let x1 = ((left + advance * 0.9).round() as i64).min(clip_x1);
            for y in top..bottom {
                for x in x0..x1 {
                    plot(x, y, 1.0);
                }
            }
        }
    }
}

/// An outline font (TrueType/OpenType) backed by `ab_glyph`.
#[derive(Clone)]
pub struct TrueTypeFont {
    font: FontArc,
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TrueTypeFont {
    /// Load a font from the bytes of a `.ttf`/`.otf` file.
    pub fn from_bytes(data: Vec<u8>) -> CanvasResult<Self> {
        let font =
            FontArc::try_from_vec(data).map_err(|e| CanvasError::InvalidFont(e.to_string()))?;
        Ok(Self { font })
    }

    /// Walk the glyphs of a line, yielding each glyph id and its pen x offset.
    fn layout_glyphs(&self, text: &str, font_size: f64) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev_id) = prev {
                pen += scaled.kern(prev_id, id);
            }
            glyphs.push((id, pen));
            pen += scaled.h_advance(id);
            prev = Some(id);
        }
        (glyphs, pen)
    }
}

impl FontMetrics for TrueTypeFont {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.layout_glyphs(text, font_size).1 as f64
    }
}

impl GlyphRasterizer for TrueTypeFont {
    fn rasterize(
        &self,
        text: &str,
        font_size: f64,
        origin: Point,
        clip: Rect,
        plot: &mut dyn FnMut(i64, i64, f32),
    ) {
        let scale = PxScale::from(font_size as f32);
        let (glyphs, _) = self.layout_glyphs(text, font_size);
        for (id, pen) in glyphs {
            let glyph =
                id.with_scale_and_position(scale, point(origin.x as f32 + pen, origin.y as f32));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let glyph_rect = Rect::new(
                bounds.min.x as f64,
                bounds.min.y as f64,
                bounds.max.x as f64,
                bounds.max.y as f64,
            );
            if glyph_rect.intersect(clip).is_zero_area() {
                continue;
            }
            outlined.draw(|px, py, coverage| {
                let x = bounds.min.x as i64 + px as i64;
                let y = bounds.min.y as i64 + py as i64;
                plot(x, y, coverage);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Metrics with fixed widths for a few strings, 5 units per char otherwise.
    struct TableMetrics(HashMap<&'static str, f64>);

    impl FontMetrics for TableMetrics {
        fn text_width(&self, text: &str, _font_size: f64) -> f64 {
            self.0
                .get(text)
                .copied()
                .unwrap_or(text.chars().count() as f64 * 5.0)
        }
    }

    fn hello_metrics() -> TableMetrics {
        TableMetrics(HashMap::from([
            ("hello", 25.0),
            ("world", 25.0),
            ("hello world", 60.0),
        ]))
    }

    #[test]
    fn test_wrap_moves_overflowing_word() {
        let layout = wrap_paragraph("hello world", 0.0, 10.0, 30.0, 12.0, &hello_metrics());
        let texts: Vec<_> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
        assert_eq!(layout.lines[0].baseline, 0.0);
        assert_eq!(layout.lines[1].baseline, 10.0);
        assert_eq!(layout.end_y, 10.0);
    }

    #[test]
    fn test_fits_on_one_line() {
        let layout = wrap_paragraph("a b c", 0.0, 10.0, 100.0, 12.0, &hello_metrics());
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].text, "a b c");
        assert_eq!(layout.end_y, 0.0);
    }

    #[test]
    fn test_long_word_placed_alone() {
        let layout = wrap_paragraph("extraordinarily ok", 0.0, 10.0, 30.0, 12.0, &hello_metrics());
        let texts: Vec<_> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["extraordinarily", "ok"]);
        assert_eq!(layout.lines[0].baseline, 0.0);
    }

    #[test]
    fn test_empty_paragraph_draws_nothing() {
        let layout = wrap_paragraph("", 40.0, 10.0, 30.0, 12.0, &hello_metrics());
        assert!(layout.lines.is_empty());
        assert_eq!(layout.end_y, 40.0);
    }

    #[test]
    fn test_paragraph_split() {
        assert_eq!(paragraphs("one\ntwo\r\nthree"), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_block_font_metrics() {
        let font = BlockFont::default();
        assert!((font.text_width("abcd", 10.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_block_font_skips_spaces() {
        let font = BlockFont::default();
        let mut xs = Vec::new();
        let clip = Rect::new(0.0, 0.0, 100.0, 100.0);
        font.rasterize("a b", 10.0, Point::new(0.0, 10.0), clip, &mut |x, _, _| xs.push(x));
        assert!(!xs.is_empty());
        // The space cell spans x in 5..10 and stays empty.
        assert!(xs.iter().all(|&x| !(5..10).contains(&x)));
    }

    #[test]
    fn test_block_font_stays_inside_clip() {
        let font = BlockFont::default();
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut plotted = 0usize;
        font.rasterize("WWWW", 1.0e6, Point::new(-1.0e5, 5.0e5), clip, &mut |x, y, _| {
            assert!((0..10).contains(&x) && (0..10).contains(&y));
            plotted += 1;
        });
        assert_eq!(plotted, 100);
    }

    #[test]
    fn test_invalid_font_bytes() {
        let err = TrueTypeFont::from_bytes(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidFont(_)));
    }
}
