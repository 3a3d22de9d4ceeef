//! Decoration style model.
//!
//! A [`DecorationStyle`] describes how a set of ranges is rendered (a glyph before or after the
//! anchor, or a foreground color over the range). Hosts turn a style into an opaque
//! [`StyleHandle`]; the engine then replaces the full list of ranges for that handle on every
//! refresh.

use crate::theme::Color;

/// Opaque host-side handle to a created [`DecorationStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleHandle(pub u64);

impl StyleHandle {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The kinds of markers the engine maintains. Each editor owns at most one style handle per
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerCategory {
    /// Line-ending glyphs.
    EndOfLine,
    /// Trailing whitespace highlighting.
    TrailingWhitespace,
}

/// Where to render a decoration's content relative to its anchor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationPlacement {
    /// Render before the anchor (in logical order).
    Before,
    /// Render after the anchor (in logical order).
    After,
}

/// A reusable visual style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecorationStyle {
    /// Virtual text inserted at the anchor.
    Marker {
        /// The glyph to render.
        content_text: String,
        /// Glyph color.
        color: Color,
        /// Before or after the anchor.
        placement: DecorationPlacement,
    },
    /// A foreground color applied to the text inside the range.
    Foreground {
        /// Text color.
        color: Color,
    },
}

impl DecorationStyle {
    /// A glyph marker style.
    pub fn marker(
        content_text: impl Into<String>,
        color: Color,
        placement: DecorationPlacement,
    ) -> Self {
        Self::Marker {
            content_text: content_text.into(),
            color,
            placement,
        }
    }

    /// A text color style.
    pub fn foreground(color: Color) -> Self {
        Self::Foreground { color }
    }

    /// The style's color.
    pub fn color(&self) -> Color {
        match self {
            Self::Marker { color, .. } | Self::Foreground { color } => *color,
        }
    }

    /// The marker glyph, if this is a marker style.
    pub fn content_text(&self) -> Option<&str> {
        match self {
            Self::Marker { content_text, .. } => Some(content_text),
            Self::Foreground { .. } => None,
        }
    }
}
