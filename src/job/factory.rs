//! Turns definitions into dictionaries and runnable jobs.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use super::builders::{
    BatchJobBuilder,
    CopyJobBuilder,
};
use super::dictionary_builders::{
    CompoundDictionaryBuilder,
    DefaultDictionaryBuilder,
};
use super::TranslationJob;
use crate::config::{
    ConfigError,
    Configuration,
    Definition,
};
use crate::dictionary::{
    Dictionary,
    ProviderRegistry,
    WritableDictionary,
};
use crate::error::Error;
use crate::logging::{
    NullLogger,
    SharedLogger,
};
use crate::registry::Registry;

/// Dictionary type used when a definition's type has no builder of its own.
const DEFAULT_DICTIONARY_BUILDER: &str = "default";

/// Builds dictionaries of one type.
pub trait DictionaryBuilder: fmt::Debug {
    /// # Errors
    /// Configuration and provider errors.
    fn build(&self, factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn Dictionary>, Error>;

    /// # Errors
    /// Configuration and provider errors.
    fn build_writable(
        &self,
        factory: &JobFactory<'_>,
        definition: &Definition,
    ) -> Result<Box<dyn WritableDictionary>, Error>;
}

/// Builds jobs of one type.
pub trait JobBuilder: fmt::Debug {
    /// # Errors
    /// Configuration and provider errors.
    fn build(&self, factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn TranslationJob>, Error>;
}

/// Holds the builders and the job logger; creates a [`JobFactory`] per
/// [`Configuration`].
#[derive(Debug)]
pub struct JobFactoryBuilder {
    /// Dictionary builders by type.
    dictionary_builders: Registry<Box<dyn DictionaryBuilder>>,
    /// Job builders by type.
    job_builders: Registry<Box<dyn JobBuilder>>,
    /// Handed to every job.
    logger: SharedLogger,
}

impl JobFactoryBuilder {
    /// Builder with the `compound` and `default` dictionary builders and the
    /// `copy` and `batch` job builders, resolving dictionaries through
    /// `providers`.
    #[must_use]
    pub fn new(providers: ProviderRegistry) -> Self {
        let mut builder = Self::empty();
        builder
            .register_dictionary_builder("compound", CompoundDictionaryBuilder)
            .register_dictionary_builder(DEFAULT_DICTIONARY_BUILDER, DefaultDictionaryBuilder::new(providers))
            .register_job_builder("copy", CopyJobBuilder)
            .register_job_builder("batch", BatchJobBuilder);
        builder
    }

    /// Builder without any registered builder.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dictionary_builders: Registry::new(),
            job_builders: Registry::new(),
            logger: Arc::new(NullLogger),
        }
    }

    /// Logger handed to every job; discards everything by default.
    #[must_use]
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn register_dictionary_builder(
        &mut self,
        type_name: &str,
        builder: impl DictionaryBuilder + 'static,
    ) -> &mut Self {
        self.dictionary_builders.register(type_name, Box::new(builder));
        self
    }

    pub fn register_job_builder(&mut self, type_name: &str, builder: impl JobBuilder + 'static) -> &mut Self {
        self.job_builders.register(type_name, Box::new(builder));
        self
    }

    #[must_use]
    pub const fn create(&self, configuration: Configuration) -> JobFactory<'_> {
        JobFactory { builders: self, configuration, building: RefCell::new(Vec::new()) }
    }
}

/// Creates dictionaries and jobs for one [`Configuration`].
///
/// Builders receive the factory and call back into it for nested
/// definitions (batch children, copy job dictionaries, compound children).
/// A reference that is reached again while it is still being built fails
/// with `CircularReference`.
#[derive(Debug, Clone)]
pub struct JobFactory<'a> {
    /// Registered builders and the job logger.
    builders: &'a JobFactoryBuilder,
    /// Definitions jobs and dictionaries are built from.
    configuration: Configuration,
    /// Kind and name of every reference currently being built, outermost first.
    building: RefCell<Vec<(&'static str, String)>>,
}

impl JobFactory<'_> {
    #[must_use]
    pub const fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    #[must_use]
    pub fn logger(&self) -> SharedLogger {
        Arc::clone(&self.builders.logger)
    }

    #[must_use]
    pub fn job_names(&self) -> Vec<String> {
        self.configuration.job_names()
    }

    /// # Errors
    /// `JobNotFound` when the configuration has no job `name`, otherwise as
    /// [`JobFactory::create_job`].
    pub fn create_job_by_name(&self, name: &str) -> Result<Box<dyn TranslationJob>, Error> {
        let definition = self.configuration.job(name)?;
        self.create_job(&definition)
    }

    /// # Errors
    /// `UnknownJobType` when `type` is missing, not a string or has no builder,
    /// `CircularReference` when the job ends up containing itself.
    pub fn create_job(&self, definition: &Definition) -> Result<Box<dyn TranslationJob>, Error> {
        self.guarded("job", definition, || {
            let type_name = job_type(definition)?;
            let builder = self
                .builders
                .job_builders
                .get(&type_name)
                .ok_or_else(|| ConfigError::UnknownJobType(type_name.clone()))?;

            tracing::debug!(name = definition.name(), "Creating {type_name} job");
            builder.build(self, definition)
        })
    }

    /// # Errors
    /// `MissingField` without a `type`, `UnknownDictionaryType` when neither
    /// the type nor the default has a builder, `CircularReference` when the
    /// dictionary ends up containing itself, and any builder error.
    pub fn create_dictionary(&self, definition: &Definition) -> Result<Box<dyn Dictionary>, Error> {
        self.guarded("dictionary", definition, || self.dictionary_builder(definition)?.build(self, definition))
    }

    /// # Errors
    /// As [`JobFactory::create_dictionary`].
    pub fn create_writable_dictionary(
        &self,
        definition: &Definition,
    ) -> Result<Box<dyn WritableDictionary>, Error> {
        self.guarded("dictionary", definition, || {
            self.dictionary_builder(definition)?.build_writable(self, definition)
        })
    }

    /// Runs `build` with `definition` marked as in progress when it is a reference.
    fn guarded<T>(
        &self,
        kind: &'static str,
        definition: &Definition,
        build: impl FnOnce() -> Result<T, Error>,
    ) -> Result<T, Error> {
        if !definition.is_reference() {
            return build();
        }
        let entry = (kind, definition.name().to_string());
        if self.building.borrow().contains(&entry) {
            return Err(ConfigError::CircularReference { kind, name: entry.1 }.into());
        }

        self.building.borrow_mut().push(entry);
        let result = build();
        self.building.borrow_mut().pop();
        result
    }

    /// Builder for the definition's type, or the default one.
    fn dictionary_builder(&self, definition: &Definition) -> Result<&dyn DictionaryBuilder, ConfigError> {
        let type_name = definition.type_name()?;
        let registry = &self.builders.dictionary_builders;
        registry
            .get(&type_name)
            .or_else(|| registry.get(DEFAULT_DICTIONARY_BUILDER))
            .map(AsRef::as_ref)
            .ok_or(ConfigError::UnknownDictionaryType(type_name))
    }
}

/// The job's `type` as a string.
fn job_type(definition: &Definition) -> Result<String, ConfigError> {
    if !definition.has("type")? {
        return Err(ConfigError::UnknownJobType(String::new()));
    }
    let value = definition.get("type")?;
    match value.as_str() {
        Some(type_name) => Ok(type_name.to_string()),
        None => Err(ConfigError::UnknownJobType(
            value.as_value().map_or_else(String::new, ToString::to_string),
        )),
    }
}
