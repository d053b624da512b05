//! In-memory dictionary backend.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{
    Serialize,
    Serializer,
};
use serde_json::Value;

use super::{
    Dictionary,
    DictionaryError,
    TranslationValue,
    WritableDictionary,
    WritableTranslationValue,
};

/// Entry storage shared between a dictionary, its clones and live entry handles.
type Entries = Rc<RefCell<IndexMap<String, MemoryTranslationValue>>>;

/// A detached translation entry.
///
/// Serializes as `{"source": ..., "target": ...}`; the key is carried by the
/// enclosing map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryTranslationValue {
    /// Key the value was read under.
    #[serde(skip)]
    key: String,
    /// Source text.
    source: Option<String>,
    /// Target text.
    target: Option<String>,
}

impl MemoryTranslationValue {
    #[must_use]
    pub fn new(key: impl Into<String>, source: Option<&str>, target: Option<&str>) -> Self {
        Self { key: key.into(), source: source.map(str::to_string), target: target.map(str::to_string) }
    }
}

impl TranslationValue for MemoryTranslationValue {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }

    fn target(&self) -> Option<String> {
        self.target.clone()
    }
}

impl WritableTranslationValue for MemoryTranslationValue {
    fn set_source(&mut self, value: &str) {
        self.source = Some(value.to_string());
    }

    fn set_target(&mut self, value: &str) {
        self.target = Some(value.to_string());
    }

    fn clear_source(&mut self) {
        self.source = None;
    }

    fn clear_target(&mut self) {
        self.target = None;
    }
}

/// Live handle on an entry of a [`MemoryDictionary`].
///
/// Reads and writes go to the dictionary. Once the entry is removed from the
/// dictionary, reads return `None` and writes are ignored.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// Key of the entry.
    key: String,
    /// Storage of the owning dictionary.
    entries: Entries,
}

impl MemoryEntry {
    /// Applies `apply` to the stored entry, if it still exists.
    fn update(&self, apply: impl FnOnce(&mut MemoryTranslationValue)) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&self.key) {
            apply(entry);
        }
    }
}

impl TranslationValue for MemoryEntry {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn source(&self) -> Option<String> {
        self.entries.borrow().get(&self.key).and_then(|entry| entry.source.clone())
    }

    fn target(&self) -> Option<String> {
        self.entries.borrow().get(&self.key).and_then(|entry| entry.target.clone())
    }
}

impl WritableTranslationValue for MemoryEntry {
    fn set_source(&mut self, value: &str) {
        self.update(|entry| entry.set_source(value));
    }

    fn set_target(&mut self, value: &str) {
        self.update(|entry| entry.set_target(value));
    }

    fn clear_source(&mut self) {
        self.update(WritableTranslationValue::clear_source);
    }

    fn clear_target(&mut self) {
        self.update(WritableTranslationValue::clear_target);
    }
}

/// Insertion-ordered dictionary held in memory.
///
/// Clones share their entries, so a clone handed to a job observes (and
/// performs) the same mutations as the original.
#[derive(Debug, Clone)]
pub struct MemoryDictionary {
    /// Source language.
    source_language: String,
    /// Target language.
    target_language: String,
    /// Entries shared by all clones.
    entries: Entries,
}

impl MemoryDictionary {
    #[must_use]
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            entries: Rc::new(RefCell::new(IndexMap::new())),
        }
    }

    /// Creates a dictionary from `{"<key>": {"source": ..., "target": ...}}`.
    ///
    /// Each entry needs at least one of `source`/`target`; values must be
    /// strings or `null`.
    ///
    /// # Errors
    /// `InvalidArgument` for anything else.
    pub fn from_json(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        translations: &Value,
    ) -> Result<Self, DictionaryError> {
        let dictionary = Self::new(source_language, target_language);
        let Value::Object(items) = translations else {
            return Err(DictionaryError::InvalidArgument(format!(
                "Invalid translation map: {translations}"
            )));
        };

        {
            let mut entries = dictionary.entries.borrow_mut();
            for (key, item) in items {
                let value = parse_item(key, item)?;
                entries.insert(key.clone(), value);
            }
        }

        Ok(dictionary)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Live handle on `key`.
    fn entry(&self, key: &str) -> MemoryEntry {
        MemoryEntry { key: key.to_string(), entries: Rc::clone(&self.entries) }
    }
}

/// Serializes as the `{"<key>": {"source": ..., "target": ...}}` map
/// [`MemoryDictionary::from_json`] reads.
impl Serialize for MemoryDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.borrow().serialize(serializer)
    }
}

/// Parses one `{"source": ..., "target": ...}` item.
fn parse_item(key: &str, item: &Value) -> Result<MemoryTranslationValue, DictionaryError> {
    let invalid = || DictionaryError::InvalidArgument(format!("Invalid translation for \"{key}\": {item}"));

    let Value::Object(fields) = item else {
        return Err(invalid());
    };
    if !fields.contains_key("source") && !fields.contains_key("target") {
        return Err(invalid());
    }

    let text = |field: &str| match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(invalid()),
    };

    Ok(MemoryTranslationValue::new(key, text("source")?, text("target")?))
}

impl Dictionary for MemoryDictionary {
    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        let keys: Vec<String> = self.entries.borrow().keys().cloned().collect();
        Box::new(keys.into_iter())
    }

    fn get(&self, key: &str) -> Result<Box<dyn TranslationValue>, DictionaryError> {
        self.entries
            .borrow()
            .get(key)
            .cloned()
            .map(|value| Box::new(value) as Box<dyn TranslationValue>)
            .ok_or_else(|| DictionaryError::not_found(key, self.describe()))
    }

    fn has(&self, key: &str) -> Result<bool, DictionaryError> {
        Ok(self.entries.borrow().contains_key(key))
    }

    fn source_language(&self) -> &str {
        &self.source_language
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }
}

impl WritableDictionary for MemoryDictionary {
    fn add(&mut self, key: &str) -> Result<Box<dyn WritableTranslationValue>, DictionaryError> {
        if self.has(key)? {
            return Err(DictionaryError::already_contained(key, self.describe()));
        }
        self.entries.borrow_mut().insert(key.to_string(), MemoryTranslationValue::new(key, None, None));

        Ok(Box::new(self.entry(key)))
    }

    fn remove(&mut self, key: &str) -> Result<(), DictionaryError> {
        if self.entries.borrow_mut().shift_remove(key).is_none() {
            return Err(DictionaryError::not_found(key, self.describe()));
        }
        Ok(())
    }

    fn get_writable(
        &mut self,
        key: &str,
    ) -> Result<Box<dyn WritableTranslationValue>, DictionaryError> {
        if !self.has(key)? {
            return Err(DictionaryError::not_found(key, self.describe()));
        }
        Ok(Box::new(self.entry(key)))
    }
}
