//! Named configuration records and their override resolution.
//!
//! A [`Definition`] holds its own data and optionally a delegate. Lookups probe
//! the own data first and fall back to the delegate key by key, while
//! [`Definition::data`] merges both views (delegate first, own data on top).

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use super::{
    ConfigError,
    Configuration,
    ConfigurationRef,
};

/// Data of a definition, in configuration order.
pub type DefinitionData = IndexMap<String, DefinitionValue>;

/// A single value of a definition: plain JSON or a list of child definitions.
#[derive(Debug, Clone)]
pub enum DefinitionValue {
    Value(Value),
    Definitions(Vec<Definition>),
}

impl DefinitionValue {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Definitions(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_definitions(&self) -> Option<&[Definition]> {
        match self {
            Self::Definitions(definitions) => Some(definitions),
            Self::Value(_) => None,
        }
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Value(Value::Object(_)))
    }
}

impl From<Value> for DefinitionValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for DefinitionValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<String> for DefinitionValue {
    fn from(value: String) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Vec<Definition>> for DefinitionValue {
    fn from(definitions: Vec<Definition>) -> Self {
        Self::Definitions(definitions)
    }
}

/// Converts a raw JSON map into definition data.
#[must_use]
pub fn data_from_map(map: serde_json::Map<String, Value>) -> DefinitionData {
    map.into_iter().map(|(key, value)| (key, DefinitionValue::Value(value))).collect()
}

/// Where a definition's delegate comes from.
#[derive(Debug, Clone)]
enum Delegate {
    /// A definition held directly (decorated definitions).
    Inline(Rc<Definition>),
    /// The configured dictionary with the same name.
    Dictionary(ConfigurationRef),
    /// The configured job with the same name.
    Job(ConfigurationRef),
}

/// What a definition describes.
#[derive(Debug, Clone)]
pub enum DefinitionKind {
    Plain,
    Dictionary,
    BatchJob { jobs: Vec<Definition> },
    CopyJob { source: Box<Definition>, target: Box<Definition> },
}

#[derive(Debug, Clone)]
pub struct Definition {
    /// Name under which the definition is configured.
    name: String,
    /// Own data, overriding the delegate's.
    data: DefinitionData,
    /// Definition this one inherits from.
    delegate: Option<Delegate>,
    /// Shape of the definition.
    kind: DefinitionKind,
}

impl Definition {
    #[must_use]
    pub fn new(name: impl Into<String>, data: DefinitionData) -> Self {
        Self { name: name.into(), data, delegate: None, kind: DefinitionKind::Plain }
    }

    #[must_use]
    pub fn dictionary(name: impl Into<String>, data: DefinitionData) -> Self {
        Self { kind: DefinitionKind::Dictionary, ..Self::new(name, data) }
    }

    /// Overrides parts of `base` without touching it.
    #[must_use]
    pub fn decorated(base: Self, overrides: DefinitionData) -> Self {
        Self {
            name: base.name.clone(),
            data: overrides,
            kind: base.kind.clone(),
            delegate: Some(Delegate::Inline(Rc::new(base))),
        }
    }

    /// Overrides the dictionary `name` of `configuration`, resolved on access.
    #[must_use]
    pub fn extended_dictionary(
        name: impl Into<String>,
        configuration: &Configuration,
        overrides: DefinitionData,
    ) -> Self {
        Self {
            name: name.into(),
            data: overrides,
            kind: DefinitionKind::Dictionary,
            delegate: Some(Delegate::Dictionary(configuration.downgrade())),
        }
    }

    /// Refers to the job `name` of `configuration`, resolved on access.
    #[must_use]
    pub fn referenced_job(
        name: impl Into<String>,
        configuration: &Configuration,
        overrides: DefinitionData,
    ) -> Self {
        Self {
            name: name.into(),
            data: overrides,
            kind: DefinitionKind::Plain,
            delegate: Some(Delegate::Job(configuration.downgrade())),
        }
    }

    #[must_use]
    pub fn batch_job(name: impl Into<String>, jobs: Vec<Self>, data: DefinitionData) -> Self {
        Self { kind: DefinitionKind::BatchJob { jobs }, ..Self::new(name, data) }
    }

    #[must_use]
    pub fn copy_job(name: impl Into<String>, source: Self, target: Self, data: DefinitionData) -> Self {
        Self {
            kind: DefinitionKind::CopyJob { source: Box::new(source), target: Box::new(target) },
            ..Self::new(name, data)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &DefinitionKind {
        &self.kind
    }

    /// Own data only, without anything inherited from the delegate.
    #[must_use]
    pub const fn local_data(&self) -> &DefinitionData {
        &self.data
    }

    /// `true` when the definition inherits from another one.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.delegate.is_some()
    }

    /// # Errors
    /// Only when the delegate can not be resolved.
    pub fn has(&self, key: &str) -> Result<bool, ConfigError> {
        if self.data.contains_key(key) {
            return Ok(true);
        }
        match self.delegate()? {
            Some(delegate) => delegate.has(key),
            None => Ok(false),
        }
    }

    /// Value for `key`, own data first.
    ///
    /// # Errors
    /// `KeyNotFound` when neither this definition nor its delegate has the key.
    pub fn get(&self, key: &str) -> Result<DefinitionValue, ConfigError> {
        if let Some(value) = self.data.get(key) {
            return Ok(value.clone());
        }
        if let Some(delegate) = self.delegate()?
            && delegate.has(key)?
        {
            return delegate.get(key);
        }
        Err(ConfigError::KeyNotFound { definition: self.name.clone(), key: key.to_string() })
    }

    /// String value for `key`.
    ///
    /// # Errors
    /// `KeyNotFound` when absent, `InvalidValue` when not a string.
    pub fn get_str(&self, key: &str) -> Result<String, ConfigError> {
        let value = self.get(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::invalid_value(key, "expected a string"))
    }

    /// Delegate data with own data merged on top.
    ///
    /// Maps present on both sides are merged one level deep; nested maps below
    /// that level and lists are replaced.
    ///
    /// # Errors
    /// `MergeConflict` when own data puts a map over a non-map value.
    pub fn data(&self) -> Result<DefinitionData, ConfigError> {
        match self.delegate()? {
            Some(delegate) => merge(delegate.data()?, &self.data),
            None => Ok(self.data.clone()),
        }
    }

    /// `true` when this definition, or the base it decorates, refers to a
    /// configured dictionary or job by name.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        match &self.delegate {
            Some(Delegate::Inline(base)) => base.is_reference(),
            Some(Delegate::Dictionary(_) | Delegate::Job(_)) => true,
            None => false,
        }
    }

    /// The job a referenced job definition points to, or the definition itself.
    ///
    /// # Errors
    /// `JobNotFound` for a dangling reference.
    pub fn resolved(&self) -> Result<Self, ConfigError> {
        if let Some(Delegate::Job(_)) = &self.delegate
            && let Some(delegate) = self.delegate()?
        {
            return delegate.resolved();
        }
        Ok(self.clone())
    }

    /// Resolves the delegate, looking configured definitions up by name.
    fn delegate(&self) -> Result<Option<Rc<Self>>, ConfigError> {
        match &self.delegate {
            None => Ok(None),
            Some(Delegate::Inline(delegate)) => Ok(Some(Rc::clone(delegate))),
            Some(Delegate::Dictionary(configuration)) => {
                configuration.upgrade()?.dictionary(&self.name).map(Some)
            }
            Some(Delegate::Job(configuration)) => configuration.upgrade()?.job(&self.name).map(Some),
        }
    }
}

/// Puts `overlay` on top of `base`, merging maps one level deep.
fn merge(mut base: DefinitionData, overlay: &DefinitionData) -> Result<DefinitionData, ConfigError> {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (
                Some(DefinitionValue::Value(Value::Object(existing))),
                DefinitionValue::Value(Value::Object(local)),
            ) => {
                for (sub_key, sub_value) in local {
                    existing.insert(sub_key.clone(), sub_value.clone());
                }
            }
            (Some(_), DefinitionValue::Value(Value::Object(_))) => {
                return Err(ConfigError::MergeConflict { key: key.clone() });
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(base)
}
