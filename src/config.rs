//! Configuration: definitions, their builders, and the loader
/// Built-in definition builders
mod builders;
/// Registry of configured dictionaries and jobs
mod configuration;
/// Definitions and override resolution
mod definition;
/// Type dispatch for definition builders
mod definition_builder;
/// Dictionary definition accessors
mod dictionary_definition;
/// Configuration errors
mod error;
/// Config file loader
mod loader;

pub use builders::{
    BatchJobDefinitionBuilder,
    CompoundDictionaryDefinitionBuilder,
    CopyJobDefinitionBuilder,
    MemoryDictionaryDefinitionBuilder,
};
pub use configuration::{
    Configuration,
    ConfigurationRef,
};
pub use definition::{
    Definition,
    DefinitionData,
    DefinitionKind,
    DefinitionValue,
    data_from_map,
};
pub use definition_builder::{
    DefinitionBuilder,
    DefinitionBuilderRegistry,
};
pub use error::{
    ConfigError,
    ValidationError,
};
pub use loader::ConfigurationLoader;
