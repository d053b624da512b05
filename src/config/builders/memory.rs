//! `memory` dictionary definitions.

use serde_json::{
    Map,
    Value,
};

use super::{
    require_keys,
    take_name,
};
use crate::config::{
    ConfigError,
    Configuration,
    Definition,
    DefinitionBuilder,
    DefinitionBuilderRegistry,
    data_from_map,
};

/// `memory` dictionaries: everything but `name` is passed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDictionaryDefinitionBuilder;

impl DefinitionBuilder for MemoryDictionaryDefinitionBuilder {
    fn build(
        &self,
        _builders: &DefinitionBuilderRegistry,
        _configuration: &Configuration,
        mut data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        require_keys(&data, &["name"])?;
        let name = take_name(&mut data)?;
        data.insert("type".to_string(), Value::from("memory"));

        Ok(Definition::dictionary(name, data_from_map(data)))
    }
}
