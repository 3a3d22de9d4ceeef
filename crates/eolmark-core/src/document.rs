//! Document capability and a rope-backed implementation.

use crate::line_ending::{self, LineEnding};
use crate::position::{Position, TextRange};
use ropey::Rope;

/// A single logical line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Zero-based line number.
    pub number: usize,
    /// Line text, excluding the line ending.
    pub text: String,
    /// Range of the line text; `range.end` is the end-of-line position.
    pub range: TextRange,
}

impl Line {
    /// Returns `true` if the line has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Read access to a host text document.
///
/// Offsets are character offsets from the start of the document, counting each line break
/// as one character.
pub trait TextDocument {
    /// Total number of logical lines (at least 1).
    fn line_count(&self) -> usize;

    /// The line at `line`, or `None` if out of range.
    fn line_at(&self, line: usize) -> Option<Line>;

    /// Convert a position to a character offset. The position is validated first.
    fn offset_at(&self, position: Position) -> usize;

    /// Convert a character offset to a position. Offsets past the end are clamped.
    fn position_at(&self, offset: usize) -> Position;

    /// Clamp a position to the document: lines past the end map to the end of the last line,
    /// columns past the end of a line map to the line end.
    fn validate_position(&self, position: Position) -> Position;

    /// The document's line-ending kind.
    fn line_ending(&self) -> LineEnding;

    /// The language identifier (e.g. `rust`), if known.
    fn language_id(&self) -> Option<&str>;
}

/// An in-memory document backed by a [`Rope`].
///
/// Text is stored LF-normalized; the line ending detected on load is kept as the
/// document's line-ending kind.
///
/// ```rust
/// use eolmark_core::{LineEnding, Position, RopeDocument, TextDocument};
///
/// let doc = RopeDocument::from_text("one\r\ntwo\r\n").with_language("plaintext");
/// assert_eq!(doc.line_ending(), LineEnding::Crlf);
/// assert_eq!(doc.line_count(), 3);
/// assert_eq!(doc.line_at(1).unwrap().text, "two");
/// assert_eq!(doc.offset_at(Position::new(1, 0)), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RopeDocument {
    rope: Rope,
    line_ending: LineEnding,
    language_id: Option<String>,
    version: u64,
}

impl RopeDocument {
    /// Build a document from text, detecting its line ending.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&line_ending::normalize_to_lf(text)),
            line_ending: line_ending::detect_in_text(text),
            language_id: None,
            version: 0,
        }
    }

    /// Set the language identifier.
    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    /// Replace the language identifier.
    pub fn set_language_id(&mut self, language_id: Option<String>) {
        self.language_id = language_id;
    }

    /// Change the line-ending kind (as when the user switches it in a status bar).
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        if self.line_ending != line_ending {
            self.line_ending = line_ending;
            self.version += 1;
        }
    }

    /// Edit version, incremented on every change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total character count (line breaks count as one).
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character length of `line`, excluding the line break. Out-of-range lines have length 0.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// The LF-normalized text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The text with the document's line ending applied, for saving.
    pub fn text_for_saving(&self) -> String {
        match self.line_ending {
            LineEnding::Lf => self.text(),
            LineEnding::Crlf => self.text().replace('\n', "\r\n"),
        }
    }

    /// Insert text at a character offset. Line breaks in `text` are normalized to LF.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.rope.len_chars());
        self.rope.insert(offset, &line_ending::normalize_to_lf(text));
        self.version += 1;
    }

    /// Delete `len` characters starting at `offset`.
    pub fn delete(&mut self, offset: usize, len: usize) {
        let start = offset.min(self.rope.len_chars());
        let end = offset.saturating_add(len).min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
            self.version += 1;
        }
    }

    /// Replace the text in `range` with `text`.
    pub fn replace(&mut self, range: TextRange, text: &str) {
        let a = self.offset_at(range.start);
        let b = self.offset_at(range.end);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        self.delete(start, end - start);
        self.insert(start, text);
    }
}

impl TextDocument for RopeDocument {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_at(&self, line: usize) -> Option<Line> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }

        let end_column = text.chars().count();
        Some(Line {
            number: line,
            text,
            range: TextRange::new(Position::new(line, 0), Position::new(line, end_column)),
        })
    }

    fn offset_at(&self, position: Position) -> usize {
        let position = self.validate_position(position);
        self.rope.line_to_char(position.line) + position.column
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    fn validate_position(&self, position: Position) -> Position {
        let last_line = self.rope.len_lines().saturating_sub(1);
        if position.line > last_line {
            return Position::new(last_line, self.line_len(last_line));
        }
        Position::new(
            position.line,
            position.column.min(self.line_len(position.line)),
        )
    }

    fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    fn language_id(&self) -> Option<&str> {
        self.language_id.as_deref()
    }
}
