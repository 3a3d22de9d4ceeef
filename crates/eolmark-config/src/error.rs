use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading a settings document.
pub enum ConfigError {
    #[error("I/O error: {0}")]
    /// Reading the settings file failed.
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    /// The settings text is not valid JSON.
    Json(#[from] serde_json::Error),

    #[error("settings root must be a JSON object, found {0}")]
    /// The settings document parsed, but its root is not an object.
    NotAnObject(&'static str),

    #[error("language section '{0}' must be a JSON object")]
    /// A `"[languageId]"` section is present but is not an object.
    InvalidLanguageSection(String),
}
