//! Dictionary and provider errors.

use thiserror::Error;

/// Errors raised by dictionaries and dictionary providers.
///
/// `dictionary` fields carry a human readable identity of the dictionary
/// involved (see [`super::Dictionary::describe`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Key \"{key}\" not found in dictionary {dictionary}")]
    TranslationNotFound { key: String, dictionary: String },

    #[error("Key \"{key}\" already contained in dictionary {dictionary}")]
    TranslationAlreadyContained { key: String, dictionary: String },

    #[error(
        "Languages can not be mixed in compounds, expected {side} language \"{expected}\" but got \"{actual}\""
    )]
    LanguageMismatch { side: LanguageSide, expected: String, actual: String },

    #[error("A dictionary with prefix \"{prefix}\" has already been added")]
    DuplicatePrefix { prefix: String },

    #[error("Key \"{key}\" has invalid format, expected \"<prefix>.<key>\"")]
    InvalidKeyFormat { key: String },

    #[error(
        "Dictionary {name} not found (requested source language: \"{source_language}\", requested target language: \"{target_language}\")"
    )]
    DictionaryNotFound { name: String, source_language: String, target_language: String },

    #[error(
        "Dictionary {name} already exists (source language: \"{source_language}\", target language: \"{target_language}\")"
    )]
    DictionaryAlreadyExists { name: String, source_language: String, target_language: String },

    #[error("{message}")]
    NotSupported { message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Which half of a language pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSide {
    Source,
    Target,
}

impl std::fmt::Display for LanguageSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

impl DictionaryError {
    /// `KeyNotFound` for `key`.
    pub(crate) fn not_found(key: impl Into<String>, dictionary: impl Into<String>) -> Self {
        Self::TranslationNotFound { key: key.into(), dictionary: dictionary.into() }
    }

    /// `KeyAlreadyContained` for `key`.
    pub(crate) fn already_contained(key: impl Into<String>, dictionary: impl Into<String>) -> Self {
        Self::TranslationAlreadyContained { key: key.into(), dictionary: dictionary.into() }
    }
}
