//! Global settings cache and per-document resolution.

use crate::keys;
use crate::settings::{
    DEFAULT_CR_GLYPH, DEFAULT_CRLF_GLYPH, DEFAULT_LF_GLYPH, EffectiveSettings, EolSetting, Glyphs,
    GlobalSettings, LineEnding, RenderWhitespace,
};
use crate::source::{ConfigSource, is_truthy, read_or};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

/// Caches global settings and derives [`EffectiveSettings`] for documents.
///
/// ```rust
/// use eolmark_config::{JsonSettings, LineEnding, RenderWhitespace, SettingsResolver};
///
/// let mut settings = JsonSettings::new();
/// settings.set("editor.renderWhitespace", "all");
/// settings.set_language("markdown", "editor.renderWhitespace", "selection");
///
/// let mut resolver = SettingsResolver::with_native(LineEnding::Lf);
/// assert!(resolver.update_configuration(&settings));
///
/// let md = resolver.resolve(&settings, Some("markdown"));
/// assert_eq!(md.render_whitespace, RenderWhitespace::Selection);
/// let rs = resolver.resolve(&settings, Some("rust"));
/// assert_eq!(rs.render_whitespace, RenderWhitespace::All);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    global: GlobalSettings,
    native: LineEnding,
}

impl SettingsResolver {
    /// Create a resolver with default global settings and the platform's native line ending.
    pub fn new() -> Self {
        Self::with_native(LineEnding::native())
    }

    /// Create a resolver that resolves `files.eol = auto` to `native`.
    pub fn with_native(native: LineEnding) -> Self {
        Self {
            global: GlobalSettings::default(),
            native,
        }
    }

    /// The cached global settings.
    pub fn global(&self) -> &GlobalSettings {
        &self.global
    }

    /// The line ending `auto` resolves to.
    pub fn native(&self) -> LineEnding {
        self.native
    }

    /// Read every global key from `source`, with documented defaults for missing or malformed
    /// values.
    pub fn read_global(source: &dyn ConfigSource) -> GlobalSettings {
        GlobalSettings {
            render_whitespace: read_or(source, keys::RENDER_WHITESPACE, RenderWhitespace::None),
            eol: read_or(source, keys::FILES_EOL, EolSetting::Auto),
            glyphs: Glyphs {
                lf: read_glyph(source, keys::NEWLINE_CHARACTER, DEFAULT_LF_GLYPH),
                cr: read_glyph(source, keys::RETURN_CHARACTER, DEFAULT_CR_GLYPH),
                crlf: read_glyph(source, keys::CRLF_CHARACTER, DEFAULT_CRLF_GLYPH),
            },
            highlight_non_default: read_or(source, keys::HIGHLIGHT_NON_DEFAULT, false),
            highlight_extra_whitespace: read_or(source, keys::HIGHLIGHT_EXTRA_WHITESPACE, false),
            decorate_before_eol: read_or(source, keys::DECORATE_BEFORE_EOL, false),
        }
    }

    /// Re-read the global settings and report whether any of them changed.
    pub fn update_configuration(&mut self, source: &dyn ConfigSource) -> bool {
        let next = Self::read_global(source);
        let prev = &self.global;

        let mut changed = Vec::new();
        if prev.render_whitespace != next.render_whitespace {
            changed.push(keys::RENDER_WHITESPACE);
        }
        if prev.eol != next.eol {
            changed.push(keys::FILES_EOL);
        }
        if prev.glyphs.lf != next.glyphs.lf {
            changed.push(keys::NEWLINE_CHARACTER);
        }
        if prev.glyphs.cr != next.glyphs.cr {
            changed.push(keys::RETURN_CHARACTER);
        }
        if prev.glyphs.crlf != next.glyphs.crlf {
            changed.push(keys::CRLF_CHARACTER);
        }
        if prev.highlight_non_default != next.highlight_non_default {
            changed.push(keys::HIGHLIGHT_NON_DEFAULT);
        }
        if prev.highlight_extra_whitespace != next.highlight_extra_whitespace {
            changed.push(keys::HIGHLIGHT_EXTRA_WHITESPACE);
        }
        if prev.decorate_before_eol != next.decorate_before_eol {
            changed.push(keys::DECORATE_BEFORE_EOL);
        }

        if changed.is_empty() {
            trace!("global configuration unchanged");
            return false;
        }

        debug!(keys = ?changed, "global configuration changed");
        self.global = next;
        true
    }

    /// Effective settings for a document in `language_id`.
    ///
    /// A language-scoped value replaces the global one only when it is truthy; unset, empty
    /// or `false` values fall through to the global setting.
    pub fn resolve(
        &self,
        source: &dyn ConfigSource,
        language_id: Option<&str>,
    ) -> EffectiveSettings {
        let mut global = self.global.clone();

        if let Some(language_id) = language_id.filter(|id| !id.is_empty()) {
            let lookup = |key: &str| source.language(language_id, key).filter(is_truthy);

            if let Some(mode) = lookup(keys::RENDER_WHITESPACE).and_then(from_value) {
                global.render_whitespace = mode;
            }
            if let Some(eol) = lookup(keys::FILES_EOL).and_then(from_value) {
                global.eol = eol;
            }
            if let Some(Value::String(glyph)) = lookup(keys::NEWLINE_CHARACTER) {
                global.glyphs.lf = glyph;
            }
            if let Some(Value::String(glyph)) = lookup(keys::RETURN_CHARACTER) {
                global.glyphs.cr = glyph;
            }
            if let Some(Value::String(glyph)) = lookup(keys::CRLF_CHARACTER) {
                global.glyphs.crlf = glyph;
            }
            if lookup(keys::HIGHLIGHT_NON_DEFAULT).is_some() {
                global.highlight_non_default = true;
            }
            if lookup(keys::HIGHLIGHT_EXTRA_WHITESPACE).is_some() {
                global.highlight_extra_whitespace = true;
            }
            if lookup(keys::DECORATE_BEFORE_EOL).is_some() {
                global.decorate_before_eol = true;
            }
        }

        EffectiveSettings::from_global(&global, self.native)
    }
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn from_value<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}

fn read_glyph(source: &dyn ConfigSource, key: &str, default: &str) -> String {
    match source.global(key) {
        Some(Value::String(glyph)) if !glyph.is_empty() => glyph,
        _ => default.to_string(),
    }
}
