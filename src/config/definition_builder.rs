//! Turns raw configuration maps into [`Definition`]s, dispatching on `type`.

use std::fmt;

use serde_json::{
    Map,
    Value,
};

use super::builders::{
    BatchJobDefinitionBuilder,
    CompoundDictionaryDefinitionBuilder,
    CopyJobDefinitionBuilder,
    MemoryDictionaryDefinitionBuilder,
};
use super::{
    ConfigError,
    Configuration,
    Definition,
};
use crate::registry::Registry;

/// Builds one kind of definition from its raw map.
///
/// Builders check their required keys before anything else and fail with
/// [`ConfigError::MissingKey`] for the first one missing.
pub trait DefinitionBuilder: fmt::Debug {
    fn build(
        &self,
        builders: &DefinitionBuilderRegistry,
        configuration: &Configuration,
        data: Map<String, Value>,
    ) -> Result<Definition, ConfigError>;
}

/// Definition builders by dictionary and job type.
#[derive(Debug, Default)]
pub struct DefinitionBuilderRegistry {
    /// Builders for dictionary definitions by `type`.
    dictionaries: Registry<Box<dyn DefinitionBuilder>>,
    /// Builders for job definitions by `type`.
    jobs: Registry<Box<dyn DefinitionBuilder>>,
}

impl DefinitionBuilderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `memory`, `compound`, `copy` and `batch` builders.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register_dictionary("memory", MemoryDictionaryDefinitionBuilder)
            .register_dictionary("compound", CompoundDictionaryDefinitionBuilder)
            .register_job("copy", CopyJobDefinitionBuilder)
            .register_job("batch", BatchJobDefinitionBuilder);
        registry
    }

    pub fn register_dictionary(
        &mut self,
        type_name: &str,
        builder: impl DefinitionBuilder + 'static,
    ) -> &mut Self {
        self.dictionaries.register(type_name, Box::new(builder));
        self
    }

    pub fn register_job(&mut self, type_name: &str, builder: impl DefinitionBuilder + 'static) -> &mut Self {
        self.jobs.register(type_name, Box::new(builder));
        self
    }

    /// # Errors
    /// `UnknownDictionaryType` when no builder handles the map's `type`.
    pub fn build_dictionary(
        &self,
        configuration: &Configuration,
        data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        let type_name = raw_type(&data);
        let builder = self
            .dictionaries
            .get(&type_name)
            .ok_or(ConfigError::UnknownDictionaryType(type_name))?;
        builder.build(self, configuration, data)
    }

    /// # Errors
    /// `UnknownJobType` when no builder handles the map's `type`.
    pub fn build_job(
        &self,
        configuration: &Configuration,
        data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        let type_name = raw_type(&data);
        let builder = self.jobs.get(&type_name).ok_or(ConfigError::UnknownJobType(type_name))?;
        builder.build(self, configuration, data)
    }
}

/// Raw `type` of an entry (empty when absent or not a string).
fn raw_type(data: &Map<String, Value>) -> String {
    data.get("type").and_then(Value::as_str).unwrap_or_default().to_string()
}
