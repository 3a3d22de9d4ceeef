//! Trailing whitespace detection.

use regex::Regex;

/// Finds the trailing whitespace run of a line (`\s+$`).
#[derive(Debug, Clone)]
pub struct TrailingWhitespace {
    regex: Regex,
}

impl TrailingWhitespace {
    /// Create the scanner.
    pub fn new() -> Self {
        Self {
            regex: Regex::new(r"\s+$").expect("valid trailing whitespace pattern"),
        }
    }

    /// Character column where the trailing whitespace of `line_text` starts, or `None` if the
    /// line does not end with whitespace.
    ///
    /// `line_text` must not include the line break.
    pub fn find(&self, line_text: &str) -> Option<usize> {
        let m = self.regex.find(line_text)?;
        Some(line_text[..m.start()].chars().count())
    }
}

impl Default for TrailingWhitespace {
    fn default() -> Self {
        Self::new()
    }
}
