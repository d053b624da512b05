//! Configuration errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "jobs.sync.source")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing key \"{key}\"{}", .path.as_ref().map(|path| format!(" in \"{path}\"")).unwrap_or_default())]
    MissingKey { key: String, path: Option<String> },

    #[error("Definition \"{definition}\" is missing field \"{field}\"")]
    MissingField { definition: String, field: String },

    #[error("Key \"{key}\" not found in definition \"{definition}\"")]
    KeyNotFound { definition: String, key: String },

    #[error("Can not merge key \"{key}\": a map can only override a map")]
    MergeConflict { key: String },

    #[error("Unknown dictionary type \"{0}\"")]
    UnknownDictionaryType(String),

    #[error("Unknown job type \"{0}\"")]
    UnknownJobType(String),

    #[error("No provider named \"{0}\" registered")]
    UnknownProvider(String),

    #[error("Invalid filter expression \"{expression}\": {source}")]
    InvalidFilter {
        /// Expression as configured.
        expression: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    #[error("Invalid value for \"{key}\": {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid definition passed: {0}")]
    InvalidDefinition(String),

    #[error("Job \"{0}\" not found in configuration")]
    JobNotFound(String),

    #[error("Dictionary \"{0}\" not found in configuration")]
    DictionaryNotFound(String),

    #[error("Circular reference to {kind} \"{name}\"")]
    CircularReference { kind: &'static str, name: String },

    #[error("Configuration has been dropped while definitions still refer to it")]
    ConfigurationDropped,

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// `MissingKey` without a path.
    pub(crate) fn missing_key(key: &str) -> Self {
        Self::MissingKey { key: key.to_string(), path: None }
    }

    /// `InvalidValue` for `key`.
    pub(crate) fn invalid_value(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue { key: key.to_string(), message: message.into() }
    }
}

/// Numbered list, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}
