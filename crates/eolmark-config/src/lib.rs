#![warn(missing_docs)]
//! `eolmark-config` - settings for the `eolmark` end-of-line decorator.
//!
//! This crate stays lightweight and host-agnostic. It provides:
//!
//! - the typed settings model ([`GlobalSettings`], [`EffectiveSettings`])
//! - the [`ConfigSource`] capability plus a `settings.json`-shaped [`JsonSettings`] store
//! - [`SettingsResolver`], which caches global settings, detects changes, and merges
//!   per-language overrides into an immutable per-document snapshot

mod error;
pub mod keys;
mod resolver;
mod settings;
mod source;

pub use error::ConfigError;
pub use resolver::SettingsResolver;
pub use settings::{
    DEFAULT_CR_GLYPH, DEFAULT_CRLF_GLYPH, DEFAULT_LF_GLYPH, EffectiveSettings, EolSetting, Glyphs,
    GlobalSettings, LineEnding, RenderWhitespace,
};
pub use source::{ConfigSource, JsonSettings, is_truthy, read_or};
