//! `compound` dictionary definitions.

use serde_json::{
    Map,
    Value,
};

use super::{
    keyed_entries,
    require_keys,
    take_name,
};
use crate::config::{
    ConfigError,
    Configuration,
    Definition,
    DefinitionBuilder,
    DefinitionBuilderRegistry,
    DefinitionData,
    DefinitionValue,
    data_from_map,
};

/// `compound` dictionaries.
///
/// Each entry of `dictionaries` is keyed by its prefix and is either the name
/// of a configured dictionary or an inline dictionary definition.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundDictionaryDefinitionBuilder;

impl DefinitionBuilder for CompoundDictionaryDefinitionBuilder {
    fn build(
        &self,
        builders: &DefinitionBuilderRegistry,
        configuration: &Configuration,
        mut data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        require_keys(&data, &["name", "dictionaries"])?;
        let name = take_name(&mut data)?;
        let entries = keyed_entries("dictionaries", data.remove("dictionaries").unwrap_or_default())?;

        let mut children = Vec::with_capacity(entries.len());
        for (prefix, entry) in entries {
            let child = match entry {
                Value::String(reference) => {
                    let mut overrides = DefinitionData::new();
                    overrides.insert("prefix".to_string(), prefix.into());
                    Definition::extended_dictionary(reference, configuration, overrides)
                }
                Value::Object(mut inline) => {
                    inline.entry("name").or_insert_with(|| Value::from(prefix.as_str()));
                    inline.entry("prefix").or_insert_with(|| Value::from(prefix));
                    builders.build_dictionary(configuration, inline)?
                }
                other => {
                    return Err(ConfigError::invalid_value(
                        &format!("{name}.dictionaries.{prefix}"),
                        format!("expected a dictionary name or definition, got {other}"),
                    ));
                }
            };
            children.push(child);
        }

        let mut definition_data = data_from_map(data);
        definition_data.insert("dictionaries".to_string(), DefinitionValue::Definitions(children));
        definition_data.insert("type".to_string(), "compound".into());

        Ok(Definition::dictionary(name, definition_data))
    }
}
