//! `copy` job definitions.

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

/// Language overrides a copy job applies to both of its dictionaries.
const LANGUAGE_KEYS: [&str; 2] = ["source_language", "target_language"];

/// `copy` jobs.
///
/// `source` and `target` are dictionary names or maps holding `name` plus
/// overrides for that dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyJobDefinitionBuilder;

impl DefinitionBuilder for CopyJobDefinitionBuilder {
    fn build(
        &self,
        _builders: &DefinitionBuilderRegistry,
        configuration: &Configuration,
        mut data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        require_keys(&data, &["name", "source", "target"])?;
        let name = take_name(&mut data)?;

        let mut overrides = Map::new();
        for key in LANGUAGE_KEYS {
            if let Some(value) = data.remove(key) {
                overrides.insert(key.to_string(), value);
            }
        }

        let source = data.remove("source").unwrap_or_default();
        let target = data.remove("target").unwrap_or_default();
        let source = dictionary(configuration, source, &overrides, &format!("{name}.source"))?;
        let target = dictionary(configuration, target, &overrides, &format!("{name}.target"))?;

        Ok(Definition::copy_job(name, source, target, data_from_map(data)))
    }
}

/// Extends the dictionary a `source`/`target` entry names, either directly or
/// as the `name` of a map whose other keys become overrides.
fn dictionary(
    configuration: &Configuration,
    value: Value,
    overrides: &Map<String, Value>,
    path: &str,
) -> Result<Definition, ConfigError> {
    let mut overrides = overrides.clone();
    let name = match value {
        Value::String(name) => name,
        Value::Object(mut inline) => {
            let Some(Value::String(name)) = inline.remove("name") else {
                return Err(ConfigError::MissingKey {
                    key: "name".to_string(),
                    path: Some(path.to_string()),
                });
            };
            overrides.extend(inline);
            name
        }
        other => {
            return Err(ConfigError::invalid_value(
                path,
                format!("expected a dictionary name or map, got {other}"),
            ));
        }
    };

    Ok(Definition::extended_dictionary(name, configuration, data_from_map(overrides)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::config::DefinitionKind;
    use crate::test_utils::{
        data,
        map,
    };

    #[fixture]
    fn configuration() -> Configuration {
        let configuration = Configuration::new();
        configuration.set_dictionary(Definition::dictionary(
            "source",
            data(json!({ "type": "memory", "source_language": "en", "target_language": "en" })),
        ));
        configuration.set_dictionary(Definition::dictionary("target", data(json!({ "type": "memory" }))));
        configuration
    }

    fn build(configuration: &Configuration, raw: Value) -> Result<Definition, ConfigError> {
        CopyJobDefinitionBuilder.build(&DefinitionBuilderRegistry::new(), configuration, map(raw))
    }

    fn parts(job: &Definition) -> (&Definition, &Definition) {
        match job.kind() {
            DefinitionKind::CopyJob { source, target } => (source, target),
            _ => unreachable!("not a copy job"),
        }
    }

    #[rstest]
    #[case::name(json!({ "type": "copy", "source": "a", "target": "b" }), "name")]
    #[case::source(json!({ "type": "copy", "name": "test", "target": "b" }), "source")]
    #[case::target(json!({ "type": "copy", "name": "test", "source": "a" }), "target")]
    #[case::all(json!({ "type": "copy" }), "name")]
    fn missing_key(configuration: Configuration, #[case] raw: Value, #[case] expected: &str) {
        assert!(matches!(
            build(&configuration, raw),
            Err(ConfigError::MissingKey { ref key, .. }) if key == expected
        ));
    }

    #[rstest]
    fn builds_from_dictionary_names(configuration: Configuration) {
        let job = build(
            &configuration,
            json!({
                "type": "copy",
                "name": "test",
                "source": "source",
                "target": "target",
                "additional_value": "foo",
            }),
        )
        .unwrap();

        assert_that!(job.name(), eq("test"));
        let local = job.local_data();
        assert_that!(local.keys().cloned().collect::<Vec<String>>(), elements_are![eq("type"), eq("additional_value")]);

        let (source, target) = parts(&job);
        assert_that!(source.name(), eq("source"));
        assert_that!(source.local_data().is_empty(), eq(true));
        assert_that!(target.name(), eq("target"));
        assert_that!(target.local_data().is_empty(), eq(true));
    }

    #[rstest]
    fn inline_map_becomes_overrides(configuration: Configuration) {
        let job = build(
            &configuration,
            json!({
                "type": "copy",
                "name": "test",
                "source": "source",
                "target": { "name": "target", "custom": "value" },
            }),
        )
        .unwrap();

        let (_, target) = parts(&job);
        assert_that!(target.name(), eq("target"));
        assert_that!(target.local_data().keys().cloned().collect::<Vec<String>>(), elements_are![eq("custom")]);
        assert_that!(target.get_str("custom").unwrap(), eq("value"));
        assert_that!(target.type_name().unwrap(), eq("memory"));
    }

    /// 言語の上書きは source と target の両方に適用される
    #[rstest]
    fn language_overrides_apply_to_both_dictionaries(configuration: Configuration) {
        let job = build(
            &configuration,
            json!({
                "type": "copy",
                "name": "test",
                "source": "source",
                "target": { "name": "target", "custom": "value" },
                "source_language": "fr",
                "target_language": "de",
            }),
        )
        .unwrap();

        let (source, target) = parts(&job);
        assert_that!(source.source_language().unwrap(), eq("fr"));
        assert_that!(source.target_language().unwrap(), eq("de"));
        assert_that!(target.source_language().unwrap(), eq("fr"));
        assert_that!(target.target_language().unwrap(), eq("de"));
        assert_that!(job.has("source_language").unwrap(), eq(false));
    }

    #[rstest]
    fn inline_map_without_name_fails_with_path(configuration: Configuration) {
        let result = build(
            &configuration,
            json!({
                "type": "copy",
                "name": "test",
                "source": "source",
                "target": { "custom": "value" },
            }),
        );

        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { ref key, path: Some(ref path) })
                if key == "name" && path == "test.target"
        ));
    }
}
