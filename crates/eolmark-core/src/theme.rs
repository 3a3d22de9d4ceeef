//! Theme colors.
//!
//! Hosts resolve named theme colors at call time. There is no theme-change notification, so
//! the engine re-reads [`ThemeColors`] on every refresh and compares the result against the
//! colors its style handles were created with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Theme color used for non-default line endings and trailing whitespace.
pub const ERROR_FOREGROUND: &str = "errorForeground";
/// Theme color used for ordinary end-of-line markers.
pub const WHITESPACE_FOREGROUND: &str = "editorWhitespace.foreground";

/// Fallback for [`ERROR_FOREGROUND`] when the theme does not define it.
pub const DEFAULT_ERROR_COLOR: Color = Color::rgb(0xF4, 0x87, 0x71);
/// Fallback for [`WHITESPACE_FOREGROUND`] when the theme does not define it.
pub const DEFAULT_WHITESPACE_COLOR: Color = Color::rgba(0xE3, 0xE4, 0xE2, 0x29);

#[derive(Debug, Error)]
/// Errors produced while parsing colors or loading theme files.
pub enum ThemeError {
    #[error("invalid color '{0}': expected #rgb, #rgba, #rrggbb or #rrggbbaa")]
    /// A color string is not a hex color.
    InvalidColor(String),

    #[error("I/O error: {0}")]
    /// Reading the theme file failed.
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    /// The theme file is not valid JSON (or a color inside it is invalid).
    Json(#[from] serde_json::Error),
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// A color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Composite this color over an opaque background.
    pub fn blend_over(self, background: Color) -> Color {
        let alpha = u16::from(self.a);
        let mix = |fg: u8, bg: u8| -> u8 {
            ((u16::from(fg) * alpha + u16::from(bg) * (255 - alpha)) / 255) as u8
        };
        Color::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThemeError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map_err(|_| invalid());
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        match hex.len() {
            3 | 4 => {
                let short = |i: usize| digit(i).map(|d| d * 0x11);
                let a = if hex.len() == 4 { short(3)? } else { 0xFF };
                Ok(Color::rgba(short(0)?, short(1)?, short(2)?, a))
            }
            6 | 8 => {
                let a = if hex.len() == 8 { byte(6)? } else { 0xFF };
                Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Resolves named theme colors.
pub trait ThemeProvider {
    /// The current value of the theme color `id`, if the theme defines it.
    fn color(&self, id: &str) -> Option<Color>;
}

/// The two theme colors the engine uses, snapshotted for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeColors {
    /// Resolved [`ERROR_FOREGROUND`].
    pub error: Color,
    /// Resolved [`WHITESPACE_FOREGROUND`].
    pub whitespace: Color,
}

impl ThemeColors {
    /// Read both colors from `theme`, falling back to the built-in defaults.
    pub fn resolve(theme: &dyn ThemeProvider) -> Self {
        Self {
            error: theme.color(ERROR_FOREGROUND).unwrap_or(DEFAULT_ERROR_COLOR),
            whitespace: theme
                .color(WHITESPACE_FOREGROUND)
                .unwrap_or(DEFAULT_WHITESPACE_COLOR),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            error: DEFAULT_ERROR_COLOR,
            whitespace: DEFAULT_WHITESPACE_COLOR,
        }
    }
}

/// A fixed color table, loadable from a theme JSON file (`{ "name": ..., "colors": { ... } }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticTheme {
    /// Theme display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Color table keyed by theme color id.
    #[serde(default)]
    pub colors: HashMap<String, Color>,
}

impl StaticTheme {
    /// An empty theme; every lookup falls back to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a color.
    pub fn set(&mut self, id: impl Into<String>, color: Color) {
        self.colors.insert(id.into(), color);
    }

    /// Builder-style [`StaticTheme::set`].
    pub fn with(mut self, id: impl Into<String>, color: Color) -> Self {
        self.set(id, color);
        self
    }

    /// Parse a theme from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a theme file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

impl ThemeProvider for StaticTheme {
    fn color(&self, id: &str) -> Option<Color> {
        self.colors.get(id).copied()
    }
}
