//! 設定ファイルの読み込み
//!
//! `{"dictionaries": {...}, "jobs": {...}}` 形式の JSON / JSONC を読み込み、
//! 定義ビルダーを通して [`Configuration`] に登録する。

use std::path::Path;

use jsonc_parser::ParseOptions;
use serde_json::{
    Map,
    Value,
};

use super::{
    ConfigError,
    Configuration,
    DefinitionBuilderRegistry,
    ValidationError,
};

/// Accepted configuration file extensions.
const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "jsonc"];

/// Loads configuration documents into a [`Configuration`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationLoader<'a> {
    /// Builders for every definition type.
    builders: &'a DefinitionBuilderRegistry,
}

impl<'a> ConfigurationLoader<'a> {
    #[must_use]
    pub const fn new(builders: &'a DefinitionBuilderRegistry) -> Self {
        Self { builders }
    }

    /// `true` for `.json` and `.jsonc` files.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| SUPPORTED_EXTENSIONS.contains(&extension))
    }

    /// 設定ファイルを読み込む
    ///
    /// # Arguments
    /// * `path` - 設定ファイルのパス
    /// * `configuration` - 追加先の設定（`None` の場合は新規作成）
    ///
    /// # Errors
    /// - 未対応の拡張子
    /// - ファイル読み込みエラー
    /// - JSONC パースエラー
    /// - 構造の検証エラー、定義ビルダーのエラー
    pub fn load_path(
        &self,
        path: &Path,
        configuration: Option<Configuration>,
    ) -> Result<Configuration, ConfigError> {
        if !self.supports(path) {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }

        tracing::debug!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, configuration)
    }

    /// Loads a JSON or JSONC document.
    pub fn load_str(
        &self,
        content: &str,
        configuration: Option<Configuration>,
    ) -> Result<Configuration, ConfigError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|error| ConfigError::Parse(error.to_string()))?
            .ok_or_else(|| ConfigError::Parse("Configuration is empty".to_string()))?;

        let configuration = configuration.unwrap_or_default();
        self.load_value(&value, &configuration)?;
        Ok(configuration)
    }

    /// Builds and registers every dictionary, then every job, of `document`.
    ///
    /// Entries without `name` are named by their key.
    pub fn load_value(&self, document: &Value, configuration: &Configuration) -> Result<(), ConfigError> {
        let (dictionaries, jobs) = sections(document).map_err(ConfigError::ValidationErrors)?;

        for (name, entry) in dictionaries {
            tracing::debug!(name, "Building dictionary definition");
            let definition = self.builders.build_dictionary(configuration, named(name, entry))?;
            configuration.set_dictionary(definition);
        }
        for (name, entry) in jobs {
            tracing::debug!(name, "Building job definition");
            let definition = self.builders.build_job(configuration, named(name, entry))?;
            configuration.set_job(definition);
        }

        Ok(())
    }
}

/// Name and raw entry of each definition in a section.
type Entries<'v> = Vec<(&'v str, &'v Map<String, Value>)>;

/// Validates the document shape, collecting every problem.
fn sections(document: &Value) -> Result<(Entries<'_>, Entries<'_>), Vec<ValidationError>> {
    let Value::Object(root) = document else {
        return Err(vec![ValidationError::new("(root)", "The configuration must be a JSON object")]);
    };

    let mut errors = Vec::new();
    let dictionaries = section(root, "dictionaries", &mut errors);
    let jobs = section(root, "jobs", &mut errors);

    if errors.is_empty() { Ok((dictionaries, jobs)) } else { Err(errors) }
}

/// Entries of the `key` section; a missing section is empty.
fn section<'v>(
    root: &'v Map<String, Value>,
    key: &str,
    errors: &mut Vec<ValidationError>,
) -> Entries<'v> {
    let Some(value) = root.get(key) else {
        return Vec::new();
    };
    let Value::Object(entries) = value else {
        errors.push(ValidationError::new(key, "Expected an object mapping names to definitions"));
        return Vec::new();
    };

    let mut result = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        match entry {
            Value::Object(map) => result.push((name.as_str(), map)),
            _ => errors.push(ValidationError::new(
                format!("{key}.{name}"),
                "Expected an object, for example: {\"type\": \"memory\"}",
            )),
        }
    }
    result
}

/// `entry` with its `name` defaulted to the section key.
fn named(name: &str, entry: &Map<String, Value>) -> Map<String, Value> {
    let mut data = entry.clone();
    data.entry("name").or_insert_with(|| Value::from(name));
    data
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::DefinitionKind;

    const CONFIG: &str = r#"{
        // JSONC: comments and trailing commas are allowed
        "dictionaries": {
            "source": { "type": "memory", "source_language": "en", "target_language": "de" },
            "target": { "type": "memory", "name": "renamed", "source_language": "en", "target_language": "de" },
        },
        "jobs": {
            "sync": { "type": "copy", "source": "source", "target": "renamed" },
            "all": { "type": "batch", "jobs": ["sync"] },
        },
    }"#;

    #[fixture]
    fn builders() -> DefinitionBuilderRegistry {
        DefinitionBuilderRegistry::with_defaults()
    }

    #[rstest]
    #[case::json("config.json", true)]
    #[case::jsonc("config.jsonc", true)]
    #[case::yaml("config.yaml", false)]
    #[case::no_extension("config", false)]
    fn supports(builders: DefinitionBuilderRegistry, #[case] file: &str, #[case] expected: bool) {
        let loader = ConfigurationLoader::new(&builders);

        assert_that!(loader.supports(Path::new(file)), eq(expected));
    }

    /// `load_path`: 設定ファイルが存在する場合
    #[rstest]
    fn load_path_with_valid_config(builders: DefinitionBuilderRegistry) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("i18n.jsonc");
        fs::write(&path, CONFIG).unwrap();

        let configuration = ConfigurationLoader::new(&builders).load_path(&path, None).unwrap();

        assert_that!(configuration.dictionary_names(), elements_are![eq("source"), eq("renamed")]);
        assert_that!(configuration.job_names(), elements_are![eq("sync"), eq("all")]);
        assert!(matches!(configuration.job("sync").unwrap().kind(), DefinitionKind::CopyJob { .. }));
        assert!(matches!(configuration.job("all").unwrap().kind(), DefinitionKind::BatchJob { .. }));
    }

    /// `load_path`: 設定ファイルが存在しない場合
    #[rstest]
    fn load_path_missing_file(builders: DefinitionBuilderRegistry) {
        let temp_dir = TempDir::new().unwrap();

        let result = ConfigurationLoader::new(&builders).load_path(&temp_dir.path().join("none.json"), None);

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[rstest]
    fn load_path_rejects_unsupported_format(builders: DefinitionBuilderRegistry) {
        let result = ConfigurationLoader::new(&builders).load_path(Path::new("config.toml"), None);

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    /// JSON パースエラー
    #[rstest]
    #[case::invalid("invalid json")]
    #[case::empty("")]
    fn load_str_parse_error(builders: DefinitionBuilderRegistry, #[case] content: &str) {
        let result = ConfigurationLoader::new(&builders).load_str(content, None);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn load_str_extends_existing_configuration(builders: DefinitionBuilderRegistry) {
        let loader = ConfigurationLoader::new(&builders);
        let configuration = loader
            .load_str(r#"{"dictionaries": {"a": {"type": "memory"}}}"#, None)
            .unwrap();

        let extended = loader
            .load_str(r#"{"dictionaries": {"b": {"type": "memory"}}}"#, Some(configuration.clone()))
            .unwrap();

        assert_that!(extended.dictionary_names(), elements_are![eq("a"), eq("b")]);
        assert_that!(configuration.dictionary_names(), elements_are![eq("a"), eq("b")]);
    }

    /// 構造エラーはまとめて報告される
    #[rstest]
    fn validation_errors_are_collected(builders: DefinitionBuilderRegistry) {
        let result = ConfigurationLoader::new(&builders)
            .load_str(r#"{"dictionaries": {"a": "memory", "b": 1}, "jobs": []}"#, None);

        let errors = match result {
            Err(ConfigError::ValidationErrors(errors)) => errors,
            other => unreachable!("unexpected result: {other:?}"),
        };
        assert_that!(
            errors,
            elements_are![
                field!(ValidationError.field_path, eq("dictionaries.a")),
                field!(ValidationError.field_path, eq("dictionaries.b")),
                field!(ValidationError.field_path, eq("jobs")),
            ]
        );
    }

    #[rstest]
    fn root_must_be_an_object(builders: DefinitionBuilderRegistry) {
        let result = ConfigurationLoader::new(&builders).load_str("[]", None);

        assert!(matches!(result, Err(ConfigError::ValidationErrors(ref errors)) if errors.len() == 1));
    }

    #[rstest]
    fn builder_errors_are_propagated(builders: DefinitionBuilderRegistry) {
        let result = ConfigurationLoader::new(&builders)
            .load_str(r#"{"jobs": {"sync": {"type": "copy", "source": "a"}}}"#, None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { ref key, .. }) if key == "target"
        ));
    }
}
