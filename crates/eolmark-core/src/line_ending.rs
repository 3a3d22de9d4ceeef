//! Line ending helpers.
//!
//! Documents store text internally using LF (`'\n'`) newlines. When loading text that uses
//! CRLF (`"\r\n"`) the content is normalized, and the detected ending is kept as the
//! document's line-ending kind.

pub use eolmark_config::LineEnding;

/// Detect the dominant line ending of a source text.
///
/// Policy: if the input contains any CRLF (`"\r\n"`), returns [`LineEnding::Crlf`],
/// otherwise [`LineEnding::Lf`].
pub fn detect_in_text(text: &str) -> LineEnding {
    if text.contains("\r\n") {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    }
}

/// Normalize CRLF and lone CR to LF.
pub fn normalize_to_lf(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(detect_in_text("a\nb\n"), LineEnding::Lf);
        assert_eq!(detect_in_text("a\r\nb"), LineEnding::Crlf);
        assert_eq!(detect_in_text("a\nb\r\n"), LineEnding::Crlf);
        assert_eq!(detect_in_text(""), LineEnding::Lf);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_to_lf("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_to_lf("plain"), "plain");
    }
}
