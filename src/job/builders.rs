//! Builders for the `copy` and `batch` job types.

use serde_json::Value;

use super::batch::BatchJob;
use super::copy::{
    CopyDictionaryJob,
    CopyPolicy,
};
use super::factory::{
    JobBuilder,
    JobFactory,
};
use super::TranslationJob;
use crate::config::{
    ConfigError,
    Definition,
    DefinitionKind,
};
use crate::error::Error;

/// Builds a [`CopyDictionaryJob`] from a copy job definition.
///
/// Optional settings: `copy-source`, `copy-target` (`true`/`"yes"`,
/// `false`/`"no"` or `"if-empty"`), `remove-obsolete` and `filter` (an
/// expression or a list of expressions).
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyJobBuilder;

impl JobBuilder for CopyJobBuilder {
    fn build(&self, factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn TranslationJob>, Error> {
        let definition = definition.resolved()?;
        let DefinitionKind::CopyJob { source, target } = definition.kind() else {
            return Err(not_a(&definition, "copy").into());
        };

        let source = factory.create_dictionary(source)?;
        let target = factory.create_writable_dictionary(target)?;
        let mut job = CopyDictionaryJob::new(source, target, factory.logger());

        if let Some(value) = setting(&definition, "copy-source")? {
            job.set_copy_source(copy_policy("copy-source", &value)?);
        }
        if let Some(value) = setting(&definition, "copy-target")? {
            job.set_copy_target(copy_policy("copy-target", &value)?);
        }
        if let Some(value) = setting(&definition, "remove-obsolete")? {
            job.set_remove_obsolete(boolish(&value).ok_or_else(|| {
                ConfigError::invalid_value("remove-obsolete", format!("expected a boolean, got {value}"))
            })?);
        }
        if let Some(value) = setting(&definition, "filter")? {
            job.set_filters(&filters(&value)?)?;
        }

        Ok(Box::new(job))
    }
}

/// Builds a [`BatchJob`] from a batch job definition, creating every child
/// through the factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchJobBuilder;

impl JobBuilder for BatchJobBuilder {
    fn build(&self, factory: &JobFactory<'_>, definition: &Definition) -> Result<Box<dyn TranslationJob>, Error> {
        let definition = definition.resolved()?;
        let DefinitionKind::BatchJob { jobs } = definition.kind() else {
            return Err(not_a(&definition, "batch").into());
        };

        let mut batch = BatchJob::new(factory.logger());
        for child in jobs {
            batch.add_job(child.name(), factory.create_job(child)?);
        }
        Ok(Box::new(batch))
    }
}

/// `InvalidDefinition` for a definition of the wrong shape.
fn not_a(definition: &Definition, kind: &str) -> ConfigError {
    ConfigError::InvalidDefinition(format!("Job \"{}\" is not a {kind} job definition", definition.name()))
}

/// Plain value of an optional setting.
fn setting(definition: &Definition, key: &str) -> Result<Option<Value>, ConfigError> {
    if !definition.has(key)? {
        return Ok(None);
    }
    let value = definition.get(key)?;
    value
        .as_value()
        .cloned()
        .map(Some)
        .ok_or_else(|| ConfigError::invalid_value(key, "expected a plain value"))
}

/// `true`/`"yes"` or `false`/`"no"`.
fn boolish(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses a `copy-source`/`copy-target` setting.
fn copy_policy(key: &str, value: &Value) -> Result<CopyPolicy, ConfigError> {
    if value.as_str() == Some("if-empty") {
        return Ok(CopyPolicy::CopyIfEmpty);
    }
    match boolish(value) {
        Some(true) => Ok(CopyPolicy::Copy),
        Some(false) => Ok(CopyPolicy::DoNotCopy),
        None => Err(ConfigError::invalid_value(
            key,
            format!("expected true, false or \"if-empty\", got {value}"),
        )),
    }
}

/// A single expression or a list of expressions.
fn filters(value: &Value) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::invalid_value("filter", format!("expected an expression or a list, got {value}"));
    match value {
        Value::String(expression) => Ok(vec![expression.clone()]),
        Value::Array(expressions) => expressions
            .iter()
            .map(|expression| expression.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::config::Configuration;
    use crate::dictionary::{
        Dictionary,
        MemoryDictionary,
        MemoryDictionaryProvider,
        ProviderRegistry,
    };
    use crate::job::JobFactoryBuilder;
    use crate::test_utils::{
        configuration,
        contents,
        data,
        memory_dictionary,
    };

    struct Fixture {
        builder: JobFactoryBuilder,
        target: MemoryDictionary,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let target = memory_dictionary(json!({
            "greeting": { "source": "Hi", "target": "Servus" },
            "stale": { "source": "Stale" },
        }));
        let provider = MemoryDictionaryProvider::new();
        provider.insert(
            "source",
            memory_dictionary(json!({
                "greeting": { "source": "Hello", "target": "Hallo" },
                "skip.me": { "source": "Skip" },
            })),
        );
        provider.insert("target", target.clone());
        let mut providers = ProviderRegistry::new();
        providers.register("memory", provider);

        Fixture { builder: JobFactoryBuilder::new(providers), target }
    }

    fn copy_configuration(settings: serde_json::Value) -> Configuration {
        let mut job = json!({ "type": "copy", "source": "source", "target": "target" });
        if let (Some(job), serde_json::Value::Object(settings)) = (job.as_object_mut(), settings) {
            job.extend(settings);
        }
        configuration(json!({
            "dictionaries": {
                "source": { "type": "memory", "source_language": "en", "target_language": "de" },
                "target": { "type": "memory", "source_language": "en", "target_language": "de" },
            },
            "jobs": { "sync": job },
        }))
    }

    #[rstest]
    #[case::yes(json!("yes"), CopyPolicy::Copy)]
    #[case::true_string(json!("true"), CopyPolicy::Copy)]
    #[case::true_bool(json!(true), CopyPolicy::Copy)]
    #[case::no(json!("no"), CopyPolicy::DoNotCopy)]
    #[case::false_bool(json!(false), CopyPolicy::DoNotCopy)]
    #[case::if_empty(json!("if-empty"), CopyPolicy::CopyIfEmpty)]
    fn copy_policy_spellings(#[case] value: serde_json::Value, #[case] expected: CopyPolicy) {
        assert_that!(copy_policy("copy-source", &value).unwrap(), eq(expected));
    }

    #[rstest]
    #[case::word(json!("always"))]
    #[case::number(json!(1))]
    fn invalid_copy_policy(#[case] value: serde_json::Value) {
        let result = copy_policy("copy-target", &value);

        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "copy-target"));
    }

    #[rstest]
    fn default_settings_copy_if_empty(fixture: Fixture) {
        let factory = fixture.builder.create(copy_configuration(json!({})));

        factory.create_job_by_name("sync").unwrap().run(None).unwrap();

        assert_eq!(
            contents(&fixture.target),
            json!({
                "greeting": { "source": "Hi", "target": "Servus" },
                "stale": { "source": "Stale", "target": null },
                "skip.me": { "source": "Skip", "target": null },
            })
        );
    }

    #[rstest]
    fn settings_are_applied(fixture: Fixture) {
        let factory = fixture.builder.create(copy_configuration(json!({
            "copy-source": "yes",
            "copy-target": true,
            "remove-obsolete": "yes",
            "filter": ["^skip\\."],
        })));

        factory.create_job_by_name("sync").unwrap().run(None).unwrap();

        assert_eq!(
            contents(&fixture.target),
            json!({ "greeting": { "source": "Hello", "target": "Hallo" } })
        );
    }

    #[rstest]
    fn single_filter_expression(fixture: Fixture) {
        let factory = fixture.builder.create(copy_configuration(json!({ "filter": "/^skip/" })));

        factory.create_job_by_name("sync").unwrap().run(None).unwrap();

        assert_that!(fixture.target.keys().collect::<Vec<_>>(), elements_are![eq("greeting"), eq("stale")]);
    }

    #[rstest]
    #[case::policy(json!({ "copy-source": "sometimes" }))]
    #[case::remove_obsolete(json!({ "remove-obsolete": 2 }))]
    #[case::filter(json!({ "filter": [1] }))]
    fn invalid_settings(fixture: Fixture, #[case] settings: serde_json::Value) {
        let factory = fixture.builder.create(copy_configuration(settings));

        let result = factory.create_job_by_name("sync");

        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidValue { .. }))));
    }

    #[rstest]
    fn invalid_filter_expression(fixture: Fixture) {
        let factory = fixture.builder.create(copy_configuration(json!({ "filter": ["("] })));

        let result = factory.create_job_by_name("sync");

        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidFilter { .. }))));
    }

    #[rstest]
    fn missing_target_dictionary_is_created(fixture: Fixture) {
        let configuration = configuration(json!({
            "dictionaries": {
                "source": { "type": "memory", "source_language": "en", "target_language": "de" },
                "fresh": { "type": "memory", "source_language": "en", "target_language": "de" },
            },
            "jobs": { "sync": { "type": "copy", "source": "source", "target": "fresh" } },
        }));
        let factory = fixture.builder.create(configuration);

        let result = factory.create_job_by_name("sync").unwrap().run(None);

        assert!(result.is_ok());
    }

    #[rstest]
    fn copy_builder_rejects_other_definitions(fixture: Fixture) {
        let factory = fixture.builder.create(Configuration::new());
        let definition = Definition::new("plain", data(json!({ "type": "copy" })));

        let result = CopyJobBuilder.build(&factory, &definition);

        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidDefinition(_)))));
    }

    #[rstest]
    fn batch_builder_rejects_other_definitions(fixture: Fixture) {
        let factory = fixture.builder.create(Configuration::new());
        let definition = Definition::new("plain", data(json!({ "type": "batch" })));

        let result = BatchJobBuilder.build(&factory, &definition);

        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidDefinition(_)))));
    }

    #[rstest]
    fn batch_builds_referenced_and_inline_children(fixture: Fixture) {
        let configuration = configuration(json!({
            "dictionaries": {
                "source": { "type": "memory", "source_language": "en", "target_language": "de" },
                "target": { "type": "memory", "source_language": "en", "target_language": "de" },
            },
            "jobs": {
                "sync": { "type": "copy", "source": "source", "target": "target" },
                "all": {
                    "type": "batch",
                    "jobs": [
                        "sync",
                        { "type": "copy", "source": "source", "target": "target", "copy-target": true },
                    ],
                },
            },
        }));
        let logger = std::sync::Arc::new(crate::logging::RecordingLogger::new());
        let builder = fixture.builder.with_logger(logger.clone());
        let factory = builder.create(configuration);

        factory.create_job_by_name("all").unwrap().run(None).unwrap();

        assert_that!(
            logger.messages().into_iter().filter(|message| message.starts_with("Executing")).collect::<Vec<_>>(),
            elements_are![eq("Executing job: sync"), eq("Executing job: all.1")]
        );
        assert_eq!(contents(&fixture.target)["greeting"]["target"], json!("Hallo"));
    }

    #[rstest]
    fn batch_with_unknown_child_fails(fixture: Fixture) {
        let configuration = configuration(json!({ "jobs": { "all": { "type": "batch", "jobs": ["missing"] } } }));
        let factory = fixture.builder.create(configuration);

        let result = factory.create_job_by_name("all");

        assert!(matches!(result, Err(Error::Config(ConfigError::JobNotFound(ref name))) if name == "missing"));
    }
}
