//! Built-in definition builders.

mod batch_job;
mod compound;
mod copy_job;
mod memory;

pub use batch_job::BatchJobDefinitionBuilder;
pub use compound::CompoundDictionaryDefinitionBuilder;
pub use copy_job::CopyJobDefinitionBuilder;
pub use memory::MemoryDictionaryDefinitionBuilder;
use serde_json::{
    Map,
    Value,
};

use super::ConfigError;

/// Fails with `MissingKey` for the first of `keys` absent from `data`.
fn require_keys(data: &Map<String, Value>, keys: &[&str]) -> Result<(), ConfigError> {
    match keys.iter().find(|key| !data.contains_key(**key)) {
        Some(key) => Err(ConfigError::missing_key(key)),
        None => Ok(()),
    }
}

/// Removes and returns the string under `name`.
fn take_name(data: &mut Map<String, Value>) -> Result<String, ConfigError> {
    match data.remove("name") {
        Some(Value::String(name)) => Ok(name),
        Some(other) => Err(ConfigError::invalid_value("name", format!("expected a string, got {other}"))),
        None => Err(ConfigError::missing_key("name")),
    }
}

/// Entries of a map or list, keyed by map key or list index.
fn keyed_entries(key: &str, value: Value) -> Result<Vec<(String, Value)>, ConfigError> {
    match value {
        Value::Object(entries) => Ok(entries.into_iter().collect()),
        Value::Array(entries) => {
            Ok(entries.into_iter().enumerate().map(|(index, entry)| (index.to_string(), entry)).collect())
        }
        other => Err(ConfigError::invalid_value(key, format!("expected a map or list, got {other}"))),
    }
}
