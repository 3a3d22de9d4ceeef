//! Logical positions, ranges and selections.
//!
//! Columns count Unicode scalar values (`char`) within a logical line, excluding the newline.

use std::cmp::Ordering;

/// Logical position (line number and column number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Shift the position by the given number of lines and columns.
    ///
    /// The result may be past the end of the document; see
    /// [`TextDocument::validate_position`](crate::TextDocument::validate_position).
    pub fn translate(self, lines: usize, columns: usize) -> Self {
        Self {
            line: self.line.saturating_add(lines),
            column: self.column.saturating_add(columns),
        }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A range between two logical positions. `start <= end` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Range start.
    pub start: Position,
    /// Range end.
    pub end: Position,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `position`.
    pub fn point(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Returns `true` if `start == end`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionDirection {
    /// Forward selection (from start to end)
    Forward,
    /// Backward selection (from end to start)
    Backward,
}

/// Selection range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Selection start position (the anchor).
    pub start: Position,
    /// Selection end position (the caret).
    pub end: Position,
    /// Selection direction
    pub direction: SelectionDirection,
}

impl Selection {
    /// Create a selection from an anchor and a caret position.
    pub fn new(anchor: Position, caret: Position) -> Self {
        let direction = if anchor <= caret {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        };
        Self {
            start: anchor,
            end: caret,
            direction,
        }
    }

    /// An empty selection (a bare caret).
    pub fn caret(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Returns `true` if the selection covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The selection's bounds in document order.
    pub fn min_max(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Whether `pos` lies within the selection, bounds included.
    pub fn contains_inclusive(&self, pos: Position) -> bool {
        let (min_pos, max_pos) = self.min_max();
        min_pos <= pos && pos <= max_pos
    }
}
