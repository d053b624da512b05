//! Dictionary builders: provider lookup and compounds.

use super::factory::{
    DictionaryBuilder,
    JobFactory,
};
use crate::config::{
    ConfigError,
    Definition,
    DefinitionData,
};
use crate::dictionary::{
    CompoundDictionary,
    Dictionary,
    DictionaryError,
    ProviderRegistry,
    WritableCompoundDictionary,
    WritableDictionary,
};
use crate::error::Error;

/// Opens dictionaries through the provider named by the definition's
/// `provider` (its `type` when absent).
///
/// A writable dictionary the provider does not know yet is created.
#[derive(Debug, Default)]
pub struct DefaultDictionaryBuilder {
    /// Providers by name.
    providers: ProviderRegistry,
}

impl DefaultDictionaryBuilder {
    #[must_use]
    pub const fn new(providers: ProviderRegistry) -> Self {
        Self { providers }
    }

    /// `NotSupported` for a provider lacking `capability`.
    fn not_supported(provider: &str, capability: &str) -> DictionaryError {
        DictionaryError::NotSupported {
            message: format!("Dictionary provider \"{provider}\" can not create {capability} dictionaries."),
        }
    }

    /// Error for a provider name without `capability`.
    fn unknown(&self, provider: String, capability: &str) -> Error {
        if self.providers.has(&provider) {
            Self::not_supported(&provider, capability).into()
        } else {
            ConfigError::UnknownProvider(provider).into()
        }
    }
}

/// Arguments every provider call takes.
struct Request {
    /// Dictionary name within the provider.
    name: String,
    /// Source language.
    source_language: String,
    /// Target language.
    target_language: String,
    /// Merged definition data.
    data: DefinitionData,
}

impl Request {
    /// Reads the request from a dictionary definition.
    fn new(definition: &Definition) -> Result<Self, ConfigError> {
        Ok(Self {
            name: definition.dictionary_name()?,
            source_language: definition.source_language()?,
            target_language: definition.target_language()?,
            data: definition.data()?,
        })
    }
}

impl DictionaryBuilder for DefaultDictionaryBuilder {
    fn build(&self, _factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn Dictionary>, Error> {
        let provider_name = definition.provider()?;
        let Some(provider) = self.providers.readable(&provider_name) else {
            return Err(self.unknown(provider_name, "readable"));
        };

        let request = Request::new(definition)?;
        tracing::debug!(name = %request.name, provider = %provider_name, "Opening dictionary");
        Ok(provider.get_dictionary(
            &request.name,
            &request.source_language,
            &request.target_language,
            &request.data,
        )?)
    }

    fn build_writable(
        &self,
        _factory: &JobFactory<'_>,
        definition: &Definition,
    ) -> Result<Box<dyn WritableDictionary>, Error> {
        let provider_name = definition.provider()?;
        let Some(provider) = self.providers.writable(&provider_name) else {
            return Err(self.unknown(provider_name, "writable"));
        };

        let request = Request::new(definition)?;
        tracing::debug!(name = %request.name, provider = %provider_name, "Opening writable dictionary");
        let opened = provider.get_dictionary_for_write(
            &request.name,
            &request.source_language,
            &request.target_language,
            &request.data,
        );
        match opened {
            Err(DictionaryError::DictionaryNotFound { .. }) => Ok(provider.create_dictionary(
                &request.name,
                &request.source_language,
                &request.target_language,
                &request.data,
            )?),
            other => Ok(other?),
        }
    }
}

/// Builds compounds from the `dictionaries` of a compound definition.
///
/// Every child is built through the factory with the compound's language
/// pair and registered under its `prefix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundDictionaryBuilder;

impl CompoundDictionaryBuilder {
    /// Child definitions by prefix, carrying the compound's languages.
    fn children(definition: &Definition) -> Result<Vec<(String, Definition)>, ConfigError> {
        let source_language = definition.source_language()?;
        let target_language = definition.target_language()?;
        let dictionaries = definition.get("dictionaries")?;
        let Some(children) = dictionaries.as_definitions() else {
            return Err(ConfigError::InvalidDefinition(format!(
                "Compound dictionary \"{}\" has no child definitions",
                definition.name()
            )));
        };

        children
            .iter()
            .map(|child| {
                let mut overrides = DefinitionData::new();
                overrides.insert("source_language".to_string(), source_language.as_str().into());
                overrides.insert("target_language".to_string(), target_language.as_str().into());
                let child = Definition::decorated(child.clone(), overrides);
                Ok((child.get_str("prefix")?, child))
            })
            .collect()
    }
}

impl DictionaryBuilder for CompoundDictionaryBuilder {
    fn build(&self, factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn Dictionary>, Error> {
        let mut compound: CompoundDictionary =
            CompoundDictionary::new(definition.source_language()?, definition.target_language()?);
        for (prefix, child) in Self::children(definition)? {
            compound.add_dictionary(prefix, factory.create_dictionary(&child)?)?;
        }
        Ok(Box::new(compound))
    }

    fn build_writable(
        &self,
        factory: &JobFactory<'_>,
        definition: &Definition,
    ) -> Result<Box<dyn WritableDictionary>, Error> {
        let mut compound =
            WritableCompoundDictionary::new(definition.source_language()?, definition.target_language()?);
        for (prefix, child) in Self::children(definition)? {
            compound.add_dictionary(prefix, factory.create_writable_dictionary(&child)?)?;
        }
        Ok(Box::new(compound))
    }
}
