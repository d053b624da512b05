//! Dictionary providers: the seam to concrete storage backends.

use std::fmt;
use std::rc::Rc;

use super::{
    Dictionary,
    DictionaryError,
    DictionaryInformation,
    WritableDictionary,
};
use crate::config::DefinitionData;
use crate::registry::Registry;

/// Opens dictionaries for reading.
pub trait DictionaryProvider: fmt::Debug {
    fn available_dictionaries(&self) -> Vec<DictionaryInformation>;

    /// # Errors
    /// `DictionaryNotFound` when no dictionary matches name and language pair.
    fn get_dictionary(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<Box<dyn Dictionary>, DictionaryError>;
}

/// Opens and creates dictionaries for writing.
pub trait WritableDictionaryProvider: fmt::Debug {
    fn available_writable_dictionaries(&self) -> Vec<DictionaryInformation>;

    /// # Errors
    /// `DictionaryNotFound` when no dictionary matches name and language pair.
    fn get_dictionary_for_write(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<Box<dyn WritableDictionary>, DictionaryError>;

    /// # Errors
    /// `DictionaryAlreadyExists` when the dictionary exists.
    fn create_dictionary(
        &self,
        name: &str,
        source_language: &str,
        target_language: &str,
        custom_data: &DefinitionData,
    ) -> Result<Box<dyn WritableDictionary>, DictionaryError>;
}

/// Providers by name, split by capability.
///
/// A provider registered with [`ProviderRegistry::register`] serves both reads
/// and writes under the same name.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    /// Providers able to open dictionaries for reading.
    readable: Registry<Rc<dyn DictionaryProvider>>,
    /// Providers able to open and create dictionaries for writing.
    writable: Registry<Rc<dyn WritableDictionaryProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P>(&mut self, name: &str, provider: P) -> &mut Self
    where
        P: DictionaryProvider + WritableDictionaryProvider + 'static,
    {
        let provider = Rc::new(provider);
        let readable: Rc<dyn DictionaryProvider> = Rc::<P>::clone(&provider);
        self.readable.register(name, readable);
        self.writable.register(name, provider);
        self
    }

    pub fn register_readable(&mut self, name: &str, provider: Rc<dyn DictionaryProvider>) -> &mut Self {
        self.readable.register(name, provider);
        self
    }

    pub fn register_writable(
        &mut self,
        name: &str,
        provider: Rc<dyn WritableDictionaryProvider>,
    ) -> &mut Self {
        self.writable.register(name, provider);
        self
    }

    /// `true` when any capability is registered under `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.readable.has(name) || self.writable.has(name)
    }

    #[must_use]
    pub fn readable(&self, name: &str) -> Option<&Rc<dyn DictionaryProvider>> {
        self.readable.get(name)
    }

    #[must_use]
    pub fn writable(&self, name: &str) -> Option<&Rc<dyn WritableDictionaryProvider>> {
        self.writable.get(name)
    }
}
