//! Input events forwarded by the shell.

use crate::error::{CanvasError, CanvasResult};
use crate::raster::RasterImage;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether strokes should be constrained to a straight axis-aligned line.
    pub fn straight_line(&self) -> bool {
        self.shift
    }
}

/// Pointer event in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Press {
        position: Point,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Release,
}

/// Kind of media item in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Music,
}

impl MediaKind {
    /// Tag used in drag tokens.
    pub fn tag(&self) -> &'static str {
        match self {
            MediaKind::Image => "IMAGE",
            MediaKind::Video => "VIDEO",
            MediaKind::Music => "MUSIC",
        }
    }
}

/// Label drawn on a placeholder when the token carries no name.
pub const DEFAULT_MEDIA_LABEL: &str = "Media";

/// String payload the side panel attaches to a drag.
///
/// Format: `IMAGE:<source>`, `VIDEO:<source>[:<name>]` or
/// `MUSIC:<source>[:<name>]`. Image sources may themselves contain colons
/// (URLs), so only video and music tokens split off a trailing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragToken {
    pub kind: MediaKind,
    pub source: String,
    pub name: Option<String>,
}

impl DragToken {
    pub fn new(kind: MediaKind, source: impl Into<String>, name: Option<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            name,
        }
    }

    pub fn parse(token: &str) -> CanvasResult<Self> {
        let invalid = || CanvasError::InvalidDragToken(token.to_string());
        let (tag, rest) = token.split_once(':').ok_or_else(invalid)?;
        let kind = match tag {
            "IMAGE" => MediaKind::Image,
            "VIDEO" => MediaKind::Video,
            "MUSIC" => MediaKind::Music,
            _ => return Err(invalid()),
        };
        if rest.is_empty() {
            return Err(invalid());
        }

        let (source, name) = match kind {
            MediaKind::Image => (rest, None),
            MediaKind::Video | MediaKind::Music => match rest.rsplit_once(':') {
                Some((source, name)) if !source.is_empty() && !name.contains('/') => {
                    (source, Some(name.to_string()).filter(|n| !n.is_empty()))
                }
                _ => (rest, None),
            },
        };

        Ok(Self::new(kind, source, name))
    }

    /// Text shown on the canvas placeholder for this item.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_MEDIA_LABEL)
    }
}

impl FromStr for DragToken {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DragToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.tag(), self.source)?;
        if let Some(name) = &self.name {
            write!(f, ":{name}")?;
        }
        Ok(())
    }
}

/// A resolved drop onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    /// Image carried by the drag itself; centered on the drop point.
    DraggedImage(RasterImage),
    /// Image loaded from a side-panel token; top-left at the drop point.
    PanelImage(RasterImage),
    /// Video or audio item; drawn as a labelled placeholder.
    Media { kind: MediaKind, label: String },
}

impl DropPayload {
    /// Placeholder payload for a non-image token.
    ///
    /// Image tokens return `None`: the shell must load their pixels and
    /// send [`DropPayload::PanelImage`].
    pub fn from_token(token: &DragToken) -> Option<Self> {
        match token.kind {
            MediaKind::Image => None,
            kind => Some(DropPayload::Media {
                kind,
                label: token.label().to_string(),
            }),
        }
    }
}
