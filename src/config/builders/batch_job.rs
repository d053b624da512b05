//! `batch` job definitions.

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
    DefinitionData,
    data_from_map,
};

/// `batch` jobs: an ordered list of job names or inline job definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchJobDefinitionBuilder;

impl DefinitionBuilder for BatchJobDefinitionBuilder {
    fn build(
        &self,
        builders: &DefinitionBuilderRegistry,
        configuration: &Configuration,
        mut data: Map<String, Value>,
    ) -> Result<Definition, ConfigError> {
        require_keys(&data, &["name", "jobs"])?;
        let name = take_name(&mut data)?;
        let Some(Value::Array(entries)) = data.remove("jobs") else {
            return Err(ConfigError::invalid_value("jobs", "expected a list of jobs"));
        };

        let mut jobs = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let job = match entry {
                Value::String(reference) => {
                    Definition::referenced_job(reference, configuration, DefinitionData::new())
                }
                Value::Object(mut inline) => {
                    inline.entry("name").or_insert_with(|| Value::from(format!("{name}.{index}")));
                    builders.build_job(configuration, inline)?
                }
                other => {
                    return Err(ConfigError::invalid_value(
                        &format!("{name}.jobs.{index}"),
                        format!("expected a job name or definition, got {other}"),
                    ));
                }
            };
            jobs.push(job);
        }

        Ok(Definition::batch_job(name, jobs, data_from_map(data)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
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

    fn build(configuration: &Configuration, raw: Value) -> Result<Definition, ConfigError> {
        BatchJobDefinitionBuilder.build(&DefinitionBuilderRegistry::with_defaults(), configuration, map(raw))
    }

    fn jobs(batch: &Definition) -> &[Definition] {
        match batch.kind() {
            DefinitionKind::BatchJob { jobs } => jobs,
            _ => unreachable!("not a batch job"),
        }
    }

    #[rstest]
    #[case::name(json!({ "type": "batch", "jobs": [] }), "name")]
    #[case::jobs(json!({ "type": "batch", "name": "test" }), "jobs")]
    fn missing_key(#[case] raw: Value, #[case] expected: &str) {
        assert!(matches!(
            build(&Configuration::new(), raw),
            Err(ConfigError::MissingKey { ref key, .. }) if key == expected
        ));
    }

    #[rstest]
    fn references_become_referenced_jobs() {
        let configuration = Configuration::new();
        configuration.set_job(Definition::new("base-job1", data(json!({ "type": "copy" }))));
        configuration.set_job(Definition::new("base-job2", data(json!({ "type": "batch" }))));

        let batch = build(
            &configuration,
            json!({ "type": "batch", "name": "test", "jobs": ["base-job1", "base-job2"] }),
        )
        .unwrap();

        let jobs = jobs(&batch);
        assert_that!(jobs.len(), eq(2));
        assert_that!(jobs[0].name(), eq("base-job1"));
        assert_that!(jobs[0].is_extended(), eq(true));
        assert_that!(jobs[0].get_str("type").unwrap(), eq("copy"));
        assert_that!(jobs[1].get_str("type").unwrap(), eq("batch"));
    }

    /// インラインのジョブには "<batch>.<index>" の名前が付く
    #[rstest]
    fn inline_jobs_are_named_by_index() {
        let configuration = Configuration::new();

        let batch = build(
            &configuration,
            json!({
                "type": "batch",
                "name": "test",
                "jobs": [
                    "referenced",
                    { "type": "copy", "source": "a", "target": "b" },
                    { "type": "copy", "name": "named", "source": "a", "target": "b" },
                ],
            }),
        )
        .unwrap();

        let jobs = jobs(&batch);
        assert_that!(jobs[1].name(), eq("test.1"));
        assert_that!(jobs[2].name(), eq("named"));
        assert!(matches!(jobs[1].kind(), DefinitionKind::CopyJob { .. }));
    }

    #[rstest]
    fn inline_job_with_unknown_type_fails() {
        let result = build(
            &Configuration::new(),
            json!({ "type": "batch", "name": "test", "jobs": [{ "type": "move" }] }),
        );

        assert!(matches!(result, Err(ConfigError::UnknownJobType(_))));
    }

    #[rstest]
    fn jobs_must_be_a_list() {
        let result = build(&Configuration::new(), json!({ "type": "batch", "name": "test", "jobs": "x" }));

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
