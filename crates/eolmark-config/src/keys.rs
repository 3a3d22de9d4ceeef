//! Recognized configuration keys.
//!
//! Keys are dotted (`section.name`). Every key can be overridden per language inside a
//! `"[languageId]"` section using the same dotted name.

/// `editor.renderWhitespace`: `none|boundary|selection|all|trailing`.
pub const RENDER_WHITESPACE: &str = "editor.renderWhitespace";
/// `files.eol`: `auto|\n|\r\n`.
pub const FILES_EOL: &str = "files.eol";
/// Glyph for LF line endings.
pub const NEWLINE_CHARACTER: &str = "code-eol.newlineCharacter";
/// Glyph for a lone CR.
pub const RETURN_CHARACTER: &str = "code-eol.returnCharacter";
/// Glyph for CRLF line endings.
pub const CRLF_CHARACTER: &str = "code-eol.crlfCharacter";
/// Highlight non-default line endings with the error color.
pub const HIGHLIGHT_NON_DEFAULT: &str = "code-eol.highlightNonDefault";
/// Highlight trailing whitespace.
pub const HIGHLIGHT_EXTRA_WHITESPACE: &str = "code-eol.highlightExtraWhitespace";
/// Place the marker before the line end instead of after it.
pub const DECORATE_BEFORE_EOL: &str = "code-eol.decorateBeforeEol";

/// Every key the resolver reads, in resolution order.
pub const ALL: [&str; 8] = [
    RENDER_WHITESPACE,
    FILES_EOL,
    NEWLINE_CHARACTER,
    RETURN_CHARACTER,
    CRLF_CHARACTER,
    HIGHLIGHT_NON_DEFAULT,
    HIGHLIGHT_EXTRA_WHITESPACE,
    DECORATE_BEFORE_EOL,
];

/// The section name used for language overrides (`"[rust]"`).
pub fn language_section(language_id: &str) -> String {
    format!("[{language_id}]")
}
