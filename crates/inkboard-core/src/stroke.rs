//! Gesture state machine for freehand, straight-line and eraser strokes.

use crate::history::History;
use crate::raster::{RasterSurface, StrokeStyle};
use kurbo::Point;

/// Drawing mode of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    /// Smoothed ink following the pointer.
    Freehand,
    /// A single horizontal or vertical segment from the anchor.
    Straight,
}

impl StrokeMode {
    fn for_modifier(straight: bool) -> Self {
        if straight {
            StrokeMode::Straight
        } else {
            StrokeMode::Freehand
        }
    }
}

/// Transient state of one press → move* → release gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    mode: StrokeMode,
    /// Ink resolved at press (background color while erasing).
    ink: StrokeStyle,
    /// Fixed start of a straight line.
    anchor: Point,
    /// Last freehand point.
    previous: Point,
    /// Snapped end of the straight-line preview, if one was drawn.
    preview_end: Option<Point>,
}

impl StrokeSession {
    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    pub fn ink(&self) -> StrokeStyle {
        self.ink
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn previous(&self) -> Point {
        self.previous
    }

    pub fn preview_end(&self) -> Option<Point> {
        self.preview_end
    }
}

/// Snap `point` onto the horizontal or vertical line through `anchor`.
///
/// Horizontal wins only when `|dx| > |dy|`; ties snap x.
pub fn constrain_to_axis(anchor: Point, point: Point) -> Point {
    let dx = (point.x - anchor.x).abs();
    let dy = (point.y - anchor.y).abs();
    if dx > dy {
        Point::new(point.x, anchor.y)
    } else {
        Point::new(anchor.x, point.y)
    }
}

/// Turns pointer events into draw calls on a [`RasterSurface`].
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    session: Option<StrokeSession>,
    eraser: bool,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint with the background color from the next press on.
    pub fn set_eraser(&mut self, eraser: bool) {
        self.eraser = eraser;
    }

    pub fn toggle_eraser(&mut self) {
        self.eraser = !self.eraser;
    }

    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        self.session.as_ref()
    }

    /// Start a gesture and mark the press point.
    ///
    /// An unreleased gesture is committed first.
    pub fn press(
        &mut self,
        surface: &mut RasterSurface,
        history: &mut History,
        point: Point,
        straight: bool,
    ) {
        if self.session.is_some() {
            log::debug!("Press during an active gesture, committing it first");
            self.release(surface, history);
        }

        let mut ink = surface.stroke_style();
        if self.eraser {
            ink.color = surface.background();
        }
        self.begin(surface, point, StrokeMode::for_modifier(straight), ink);
    }

    fn begin(
        &mut self,
        surface: &mut RasterSurface,
        point: Point,
        mode: StrokeMode,
        ink: StrokeStyle,
    ) {
        self.session = Some(StrokeSession {
            mode,
            ink,
            anchor: point,
            previous: point,
            preview_end: None,
        });
        // A click without drag still leaves a mark.
        surface.stroke_segment(point, point, &ink);
    }

    /// Extend the gesture. Returns false when no gesture is active.
    pub fn move_to(
        &mut self,
        surface: &mut RasterSurface,
        history: &History,
        point: Point,
        straight: bool,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let wanted = StrokeMode::for_modifier(straight);
        if session.mode != wanted {
            let ink = session.ink;
            log::trace!("Stroke mode switched to {wanted:?} at {point:?}");
            self.begin(surface, point, wanted, ink);
            return true;
        }

        match session.mode {
            StrokeMode::Freehand => {
                let previous = session.previous;
                let control = previous.midpoint(point);
                surface.stroke_quad(previous, control, point, &session.ink);
                session.previous = point;
                log::trace!("Freehand {previous:?} -> {point:?}");
            }
            StrokeMode::Straight => {
                let end = constrain_to_axis(session.anchor, point);
                // Repaint from the committed state so previews never pile up.
                surface.restore(history.current());
                surface.stroke_segment(session.anchor, end, &session.ink);
                session.preview_end = Some(end);
                log::trace!("Straight preview {:?} -> {end:?}", session.anchor);
            }
        }
        true
    }

    /// Finish the gesture and record it. Returns false when no gesture was
    /// active.
    pub fn release(&mut self, surface: &mut RasterSurface, history: &mut History) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        history.push(surface.snapshot());
        log::debug!("Committed {:?} stroke", session.mode);
        true
    }

    /// Forget the active gesture without recording it. Only used when the
    /// whole canvas is being reset.
    pub(crate) fn discard(&mut self) {
        self.session = None;
    }
}
