//! Typed settings values.
//!
//! Global values are cached in [`GlobalSettings`]; per-document values are derived from them
//! (plus language overrides) as an immutable [`EffectiveSettings`] snapshot.

use serde::{Deserialize, Serialize};

/// Default glyph rendered at the end of LF-terminated lines.
pub const DEFAULT_LF_GLYPH: &str = "↓";
/// Default glyph for a lone carriage return.
pub const DEFAULT_CR_GLYPH: &str = "←";
/// Default glyph rendered at the end of CRLF-terminated lines.
pub const DEFAULT_CRLF_GLYPH: &str = "↵";

/// A newline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[serde(rename = "\n")]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    #[serde(rename = "\r\n")]
    Crlf,
}

impl LineEnding {
    /// The native line ending of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) { Self::Crlf } else { Self::Lf }
    }

    /// The literal newline sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Short human-readable label (`LF` / `CRLF`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
        }
    }
}

/// `editor.renderWhitespace` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderWhitespace {
    /// Nothing is rendered.
    #[default]
    None,
    /// Whitespace except single spaces between words.
    Boundary,
    /// Only within selected text.
    Selection,
    /// Everywhere.
    All,
    /// Only trailing whitespace.
    Trailing,
}

impl RenderWhitespace {
    /// All modes, in the order hosts usually present them.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Boundary,
        Self::Selection,
        Self::All,
        Self::Trailing,
    ];

    /// The configuration string for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Boundary => "boundary",
            Self::Selection => "selection",
            Self::All => "all",
            Self::Trailing => "trailing",
        }
    }

    /// Whether end-of-line markers are rendered at all in this mode.
    pub fn renders_end_of_line(self) -> bool {
        self != Self::None
    }

    /// Whether end-of-line markers are restricted to selected text.
    pub fn selection_only(self) -> bool {
        self == Self::Selection
    }

    /// The next mode in [`RenderWhitespace::ALL`], wrapping around.
    pub fn cycle(self) -> Self {
        let index = Self::ALL.iter().position(|mode| *mode == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// `files.eol`: the line ending used for new files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EolSetting {
    /// Use the platform's native line ending.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Always LF.
    #[serde(rename = "\n")]
    Lf,
    /// Always CRLF.
    #[serde(rename = "\r\n")]
    Crlf,
}

impl EolSetting {
    /// Resolve `auto` against the given native line ending.
    pub fn resolve(self, native: LineEnding) -> LineEnding {
        match self {
            Self::Auto => native,
            Self::Lf => LineEnding::Lf,
            Self::Crlf => LineEnding::Crlf,
        }
    }
}

/// Marker glyphs, one per line-ending kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyphs {
    /// Glyph for LF.
    pub lf: String,
    /// Glyph for a lone CR.
    pub cr: String,
    /// Glyph for CRLF.
    pub crlf: String,
}

impl Glyphs {
    /// The glyph used for documents with the given line ending.
    pub fn for_line_ending(&self, line_ending: LineEnding) -> &str {
        match line_ending {
            LineEnding::Lf => &self.lf,
            LineEnding::Crlf => &self.crlf,
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            lf: DEFAULT_LF_GLYPH.to_string(),
            cr: DEFAULT_CR_GLYPH.to_string(),
            crlf: DEFAULT_CRLF_GLYPH.to_string(),
        }
    }
}

/// Cached global settings, as last read from the configuration store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalSettings {
    /// `editor.renderWhitespace`.
    pub render_whitespace: RenderWhitespace,
    /// `files.eol`.
    pub eol: EolSetting,
    /// `code-eol.newlineCharacter` / `returnCharacter` / `crlfCharacter`.
    pub glyphs: Glyphs,
    /// `code-eol.highlightNonDefault`.
    pub highlight_non_default: bool,
    /// `code-eol.highlightExtraWhitespace`.
    pub highlight_extra_whitespace: bool,
    /// `code-eol.decorateBeforeEol`.
    pub decorate_before_eol: bool,
}

/// Settings in effect for one document.
///
/// `default_eol` is already resolved (`auto` has been replaced by the native ending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    /// Whitespace render mode.
    pub render_whitespace: RenderWhitespace,
    /// The configured default ending for new files.
    pub default_eol: LineEnding,
    /// Marker glyphs.
    pub glyphs: Glyphs,
    /// Color markers of non-default endings with the error color.
    pub highlight_non_default: bool,
    /// Highlight trailing whitespace runs.
    pub highlight_extra_whitespace: bool,
    /// Render the marker before the line end instead of after it.
    pub decorate_before_eol: bool,
}

impl EffectiveSettings {
    /// Build effective settings from global settings only, resolving `auto` with `native`.
    pub fn from_global(global: &GlobalSettings, native: LineEnding) -> Self {
        Self {
            render_whitespace: global.render_whitespace,
            default_eol: global.eol.resolve(native),
            glyphs: global.glyphs.clone(),
            highlight_non_default: global.highlight_non_default,
            highlight_extra_whitespace: global.highlight_extra_whitespace,
            decorate_before_eol: global.decorate_before_eol,
        }
    }

    /// Whether a document with `line_ending` differs from the configured default.
    pub fn is_non_default(&self, line_ending: LineEnding) -> bool {
        line_ending != self.default_eol
    }
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self::from_global(&GlobalSettings::default(), LineEnding::native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_whitespace_deserialize_and_cycle() {
        for mode in RenderWhitespace::ALL {
            let value = serde_json::Value::from(mode.as_str());
            assert_eq!(serde_json::from_value::<RenderWhitespace>(value).unwrap(), mode);
        }
        assert!(serde_json::from_value::<RenderWhitespace>("sometimes".into()).is_err());
        assert_eq!(RenderWhitespace::Trailing.cycle(), RenderWhitespace::None);
        assert!(RenderWhitespace::Boundary.renders_end_of_line());
        assert!(!RenderWhitespace::None.renders_end_of_line());
    }

    #[test]
    fn test_eol_setting_resolves_auto_to_native() {
        assert_eq!(EolSetting::Auto.resolve(LineEnding::Crlf), LineEnding::Crlf);
        assert_eq!(EolSetting::Auto.resolve(LineEnding::Lf), LineEnding::Lf);
        assert_eq!(EolSetting::Lf.resolve(LineEnding::Crlf), LineEnding::Lf);
        assert_eq!(
            serde_json::from_value::<EolSetting>("\r\n".into()).unwrap(),
            EolSetting::Crlf
        );
        assert_eq!(
            serde_json::from_value::<EolSetting>("auto".into()).unwrap(),
            EolSetting::Auto
        );
        assert!(serde_json::from_value::<EolSetting>("lf".into()).is_err());
    }

    #[test]
    fn test_non_default_detection() {
        let global = GlobalSettings {
            eol: EolSetting::Lf,
            ..GlobalSettings::default()
        };
        let settings = EffectiveSettings::from_global(&global, LineEnding::Crlf);
        assert!(!settings.is_non_default(LineEnding::Lf));
        assert!(settings.is_non_default(LineEnding::Crlf));
    }
}
