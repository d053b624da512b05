//! Provider serving named [`MemoryDictionary`] instances.

use std::cell::RefCell;

use indexmap::IndexMap;
use serde::{
    Serialize,
    Serializer,
};

use super::{
    Dictionary,
    DictionaryError,
    DictionaryInformation,
    DictionaryProvider,
    MemoryDictionary,
    WritableDictionary,
    WritableDictionaryProvider,
};
use crate::config::{
    DefinitionData,
    DefinitionValue,
};

/// Keeps memory dictionaries by name for the lifetime of the provider.
///
/// Dictionaries handed out share their entries with the provider's copy, so
/// whatever a job writes can be read back through the provider.
#[derive(Debug, Default)]
pub struct MemoryDictionaryProvider {
    /// Dictionaries by name.
    dictionaries: RefCell<IndexMap<String, MemoryDictionary>>,
}

impl MemoryDictionaryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a dictionary under `name`.
    pub fn insert(&self, name: impl Into<String>, dictionary: MemoryDictionary) {
        self.dictionaries.borrow_mut().insert(name.into(), dictionary);
    }

    /// Looks up a dictionary by name, ignoring languages.
    #[must_use]
    pub fn dictionary(&self, name: &str) -> Option<MemoryDictionary> {
        self.dictionaries.borrow().get(name).cloned()
    }

    /// Dictionary `name` when its languages match.
    fn find(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
    ) -> Option<MemoryDictionary> {
        self.dictionaries
            .borrow()
            .get(name)
            .filter(|dictionary| {
                dictionary.source_language() == source_language
                    && dictionary.target_language() == target_language
            })
            .cloned()
    }

    /// Opens `name`, seeding it from the definition's `translations` object
    /// when the provider does not know the name yet.
    fn open(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<MemoryDictionary, DictionaryError> {
        if let Some(dictionary) = self.find(name, source_language, target_language) {
            return Ok(dictionary);
        }
        let seed = custom_data.get("translations").and_then(DefinitionValue::as_value);
        match seed {
            Some(translations) if self.dictionary(name).is_none() => {
                tracing::debug!(name, "Memory: seeding dictionary from definition");
                let dictionary =
                    MemoryDictionary::from_json(source_language, target_language, translations)?;
                self.insert(name, dictionary.clone());
                Ok(dictionary)
            }
            _ => Err(Self::not_found(name, source_language, target_language)),
        }
    }

    /// Name and languages of every dictionary.
    fn information(&self) -> Vec<DictionaryInformation> {
        self.dictionaries
            .borrow()
            .iter()
            .map(|(name, dictionary)| {
                DictionaryInformation::new(
                    name,
                    dictionary.source_language(),
                    dictionary.target_language(),
                )
            })
            .collect()
    }

    /// `DictionaryNotFound` for the requested name and languages.
    fn not_found(name: &str, source_language: &str, target_language: &str) -> DictionaryError {
        DictionaryError::DictionaryNotFound {
            name: name.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Serializes every dictionary by name.
impl Serialize for MemoryDictionaryProvider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.dictionaries.borrow().serialize(serializer)
    }
}

impl DictionaryProvider for MemoryDictionaryProvider {
    fn available_dictionaries(&self) -> Vec<DictionaryInformation> {
        self.information()
    }

    fn get_dictionary(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<Box<dyn Dictionary>, DictionaryError> {
        tracing::debug!(name, "Memory: opening dictionary");
        let dictionary = self.open(name, source_language, target_language, custom_data)?;
        Ok(Box::new(dictionary))
    }
}

impl WritableDictionaryProvider for MemoryDictionaryProvider {
    fn available_writable_dictionaries(&self) -> Vec<DictionaryInformation> {
        self.information()
    }

    fn get_dictionary_for_write(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<Box<dyn WritableDictionary>, DictionaryError> {
        tracing::debug!(name, "Memory: opening writable dictionary");
        let dictionary = self.open(name, source_language, target_language, custom_data)?;
        Ok(Box::new(dictionary))
    }

    fn create_dictionary(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        _custom_data: &DefinitionData,
    ) -> Result<Box<dyn WritableDictionary>, DictionaryError> {
        tracing::debug!(name, "Memory: creating new dictionary");
        if self.find(name, source_language, target_language).is_some() {
            return Err(DictionaryError::DictionaryAlreadyExists {
                name: name.to_string(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
            });
        }

        let dictionary = MemoryDictionary::new(source_language, target_language);
        self.insert(name, dictionary.clone());
        Ok(Box::new(dictionary))
    }
}
