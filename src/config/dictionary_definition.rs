//! Accessors shared by all dictionary definitions.

use super::{
    ConfigError,
    Definition,
};

impl Definition {
    /// The dictionary type, selecting the dictionary builder.
    pub fn type_name(&self) -> Result<String, ConfigError> {
        self.required_str("type")
    }

    /// Provider name, defaulting to the type.
    pub fn provider(&self) -> Result<String, ConfigError> {
        match self.optional_str("provider")? {
            Some(provider) => Ok(provider),
            None => self.type_name(),
        }
    }

    /// Name of the dictionary at the provider, defaulting to the definition name.
    pub fn dictionary_name(&self) -> Result<String, ConfigError> {
        Ok(self.optional_str("dictionary")?.unwrap_or_else(|| self.name().to_string()))
    }

    pub fn source_language(&self) -> Result<String, ConfigError> {
        self.required_str("source_language")
    }

    pub fn target_language(&self) -> Result<String, ConfigError> {
        self.required_str("target_language")
    }

    /// String value of `key`, `None` when absent.
    fn optional_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        if !self.has(key)? {
            return Ok(None);
        }
        self.get_str(key).map(Some)
    }

    /// String value of `key`, `MissingField` when absent.
    fn required_str(&self, key: &str) -> Result<String, ConfigError> {
        self.optional_str(key)?.ok_or_else(|| ConfigError::MissingField {
            definition: self.name().to_string(),
            field: key.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::config::definition::data_from_map;

    fn definition(value: serde_json::Value) -> Definition {
        let serde_json::Value::Object(map) = value else { unreachable!() };
        Definition::dictionary("messages", data_from_map(map))
    }

    #[rstest]
    fn reads_explicit_values() {
        let definition = definition(json!({
            "type": "memory",
            "provider": "files",
            "dictionary": "strings",
            "source_language": "en",
            "target_language": "de",
        }));

        assert_that!(definition.type_name().unwrap(), eq("memory"));
        assert_that!(definition.provider().unwrap(), eq("files"));
        assert_that!(definition.dictionary_name().unwrap(), eq("strings"));
        assert_that!(definition.source_language().unwrap(), eq("en"));
        assert_that!(definition.target_language().unwrap(), eq("de"));
    }

    /// provider は type、dictionary は name にフォールバック
    #[rstest]
    fn falls_back_to_defaults() {
        let definition = definition(json!({ "type": "memory" }));

        assert_that!(definition.provider().unwrap(), eq("memory"));
        assert_that!(definition.dictionary_name().unwrap(), eq("messages"));
    }

    #[rstest]
    #[case::type_name("type")]
    #[case::source_language("source_language")]
    #[case::target_language("target_language")]
    fn missing_required_field(#[case] field: &str) {
        let definition = definition(json!({}));

        let result = match field {
            "type" => definition.type_name(),
            "source_language" => definition.source_language(),
            _ => definition.target_language(),
        };

        assert!(matches!(
            result,
            Err(ConfigError::MissingField { field: ref missing, .. }) if missing == field
        ));
    }

    #[rstest]
    fn provider_without_type_is_missing_type() {
        let definition = definition(json!({}));

        assert!(matches!(
            definition.provider(),
            Err(ConfigError::MissingField { ref field, .. }) if field == "type"
        ));
    }
}
