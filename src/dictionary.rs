//! Dictionary abstraction shared by all backends and the synchronization engine.
//!
//! A dictionary maps translation keys to a [`TranslationValue`] holding the
//! source-language and target-language text for one language pair.

mod compound;
mod error;
mod memory;
mod memory_provider;
mod provider;

use std::fmt;

pub use compound::{
    CompoundDictionary,
    PrefixedValue,
    WritableCompoundDictionary,
};
pub use error::{
    DictionaryError,
    LanguageSide,
};
pub use memory::{
    MemoryDictionary,
    MemoryEntry,
    MemoryTranslationValue,
};
pub use memory_provider::MemoryDictionaryProvider;
pub use provider::{
    DictionaryProvider,
    ProviderRegistry,
    WritableDictionaryProvider,
};

/// A single translation entry.
pub trait TranslationValue: fmt::Debug {
    fn key(&self) -> String;

    fn source(&self) -> Option<String>;

    fn target(&self) -> Option<String>;

    /// `true` for a missing or empty source text.
    fn is_source_empty(&self) -> bool {
        self.source().is_none_or(|text| text.is_empty())
    }

    /// `true` for a missing or empty target text.
    fn is_target_empty(&self) -> bool {
        self.target().is_none_or(|text| text.is_empty())
    }
}

/// A translation entry that writes through to its dictionary.
pub trait WritableTranslationValue: TranslationValue {
    fn set_source(&mut self, value: &str);

    fn set_target(&mut self, value: &str);

    fn clear_source(&mut self);

    fn clear_target(&mut self);
}

/// Read access to a dictionary.
pub trait Dictionary: fmt::Debug {
    /// All keys in the dictionary's natural order.
    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_>;

    /// # Errors
    /// `TranslationNotFound` when the key is absent.
    fn get(&self, key: &str) -> Result<Box<dyn TranslationValue>, DictionaryError>;

    /// # Errors
    /// Only for keys a dictionary can not even route (see compound dictionaries).
    fn has(&self, key: &str) -> Result<bool, DictionaryError>;

    fn source_language(&self) -> &str;

    fn target_language(&self) -> &str;

    /// Identity used in error messages.
    fn describe(&self) -> String {
        format!("{} => {}", self.source_language(), self.target_language())
    }
}

/// Read and write access to a dictionary.
pub trait WritableDictionary: Dictionary {
    /// Adds an empty entry for `key`.
    ///
    /// # Errors
    /// `TranslationAlreadyContained` when the key exists.
    fn add(&mut self, key: &str) -> Result<Box<dyn WritableTranslationValue>, DictionaryError>;

    /// # Errors
    /// `TranslationNotFound` when the key is absent.
    fn remove(&mut self, key: &str) -> Result<(), DictionaryError>;

    /// # Errors
    /// `TranslationNotFound` when the key is absent.
    fn get_writable(
        &mut self,
        key: &str,
    ) -> Result<Box<dyn WritableTranslationValue>, DictionaryError>;
}

/// Name and language pair of a dictionary a provider can open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryInformation {
    pub name: String,
    pub source_language: String,
    pub target_language: String,
}

impl DictionaryInformation {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

impl fmt::Display for DictionaryInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} => {}", self.name, self.source_language, self.target_language)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn dictionary_information_display() {
        let information = DictionaryInformation::new("messages", "en", "de");

        assert_that!(information.to_string(), eq("messages en => de"));
    }

    #[rstest]
    #[case::missing(None, true)]
    #[case::empty(Some(""), true)]
    #[case::text(Some("Hello"), false)]
    fn emptiness_covers_missing_and_empty(#[case] source: Option<&str>, #[case] expected: bool) {
        let value = MemoryTranslationValue::new("key", source, source);

        assert_that!(value.is_source_empty(), eq(expected));
        assert_that!(value.is_target_empty(), eq(expected));
    }
}
