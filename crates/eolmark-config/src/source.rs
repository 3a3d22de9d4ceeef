//! Configuration store capability and a JSON-backed implementation.

use crate::error::ConfigError;
use crate::keys;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;

/// Read access to a scoped configuration store.
///
/// Hosts implement this over their own settings model. Values are JSON values so that the
/// resolver can apply the same "typed default" fallbacks regardless of the host.
pub trait ConfigSource {
    /// Read a global key (e.g. `editor.renderWhitespace`).
    fn global(&self, key: &str) -> Option<Value>;

    /// Read a key from the language-bracketed section of `language_id`.
    fn language(&self, language_id: &str, key: &str) -> Option<Value>;
}

/// Read a global key and deserialize it, falling back to `default` when it is missing or has
/// the wrong type.
pub fn read_or<T: DeserializeOwned>(source: &dyn ConfigSource, key: &str, default: T) -> T {
    source
        .global(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or(default)
}

/// JavaScript-style truthiness, used for language overrides.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A settings document shaped like an editor `settings.json`.
///
/// Keys may be written dotted at the top level (`"files.eol": "\n"`) or nested
/// (`"files": { "eol": "\n" }`); dotted entries win. Language overrides live in
/// `"[languageId]"` sections that follow the same rules.
///
/// ```rust
/// use eolmark_config::{ConfigSource, JsonSettings};
///
/// let settings: JsonSettings = r#"{
///     "editor.renderWhitespace": "all",
///     "[markdown]": { "code-eol.highlightExtraWhitespace": true }
/// }"#.parse().unwrap();
///
/// assert_eq!(settings.global("editor.renderWhitespace").unwrap(), "all");
/// assert_eq!(settings.language("markdown", "code-eol.highlightExtraWhitespace").unwrap(), true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSettings {
    root: Map<String, Value>,
}

impl JsonSettings {
    /// Create an empty settings document (every key at its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from a parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let root = match value {
            Value::Object(map) => map,
            Value::Null => return Err(ConfigError::NotAnObject("null")),
            Value::Bool(_) => return Err(ConfigError::NotAnObject("a boolean")),
            Value::Number(_) => return Err(ConfigError::NotAnObject("a number")),
            Value::String(_) => return Err(ConfigError::NotAnObject("a string")),
            Value::Array(_) => return Err(ConfigError::NotAnObject("an array")),
        };

        for (key, value) in &root {
            if is_language_section(key) && !value.is_object() {
                return Err(ConfigError::InvalidLanguageSection(key.clone()));
            }
        }

        Ok(Self { root })
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Set a global key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.root.insert(key.to_string(), value.into());
    }

    /// Remove a global key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.root.remove(key)
    }

    /// Set a key inside the `"[languageId]"` section, creating the section if needed.
    pub fn set_language(&mut self, language_id: &str, key: &str, value: impl Into<Value>) {
        let section = self
            .root
            .entry(keys::language_section(language_id))
            .or_insert_with(|| Value::Object(Map::new()));
        if !section.is_object() {
            *section = Value::Object(Map::new());
        }
        if let Value::Object(map) = section {
            map.insert(key.to_string(), value.into());
        }
    }

    /// The whole document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

impl FromStr for JsonSettings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl ConfigSource for JsonSettings {
    fn global(&self, key: &str) -> Option<Value> {
        lookup(&self.root, key).cloned()
    }

    fn language(&self, language_id: &str, key: &str) -> Option<Value> {
        match self.root.get(&keys::language_section(language_id)) {
            Some(Value::Object(section)) => lookup(section, key).cloned(),
            _ => None,
        }
    }
}

fn is_language_section(key: &str) -> bool {
    key.len() > 2 && key.starts_with('[') && key.ends_with(']')
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }

    let mut segments = key.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
