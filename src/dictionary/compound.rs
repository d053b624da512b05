//! Union of prefix-routed child dictionaries sharing one language pair.

use indexmap::IndexMap;

use super::{
    Dictionary,
    DictionaryError,
    LanguageSide,
    TranslationValue,
    WritableDictionary,
    WritableTranslationValue,
};

/// Dictionary routing `"<prefix>.<key>"` to the child registered under `prefix`.
///
/// `D` is the capability every child must provide: plain [`Dictionary`] for
/// read-only compounds, [`WritableDictionary`] for
/// [`WritableCompoundDictionary`].
#[derive(Debug)]
pub struct CompoundDictionary<D: ?Sized = dyn Dictionary> {
    /// Language every child must read from.
    source_language: String,
    /// Language every child must translate to.
    target_language: String,
    /// Children by prefix.
    children: IndexMap<String, Box<D>>,
}

/// Compound whose children are all writable.
pub type WritableCompoundDictionary = CompoundDictionary<dyn WritableDictionary>;

impl<D: Dictionary + ?Sized> CompoundDictionary<D> {
    #[must_use]
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            children: IndexMap::new(),
        }
    }

    /// Registers `dictionary` under `prefix`.
    ///
    /// # Errors
    /// `DuplicatePrefix` when the prefix is taken, `LanguageMismatch` when the
    /// child's language pair differs. Nothing is registered on error.
    pub fn add_dictionary(
        &mut self,
        prefix: impl Into<String>,
        dictionary: Box<D>,
    ) -> Result<&mut Self, DictionaryError> {
        let prefix = prefix.into();
        if self.children.contains_key(&prefix) {
            return Err(DictionaryError::DuplicatePrefix { prefix });
        }
        check_language(LanguageSide::Source, &self.source_language, dictionary.source_language())?;
        check_language(LanguageSide::Target, &self.target_language, dictionary.target_language())?;

        self.children.insert(prefix, dictionary);
        Ok(self)
    }

    #[must_use]
    pub fn prefixes(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    /// Prefix, remainder and child dictionary of `key`.
    fn route<'k>(&self, key: &'k str) -> Result<(&'k str, &'k str, &D), DictionaryError> {
        let (prefix, remainder) = split_key(key)?;
        let child = self
            .children
            .get(prefix)
            .ok_or_else(|| DictionaryError::not_found(key, self.describe()))?;
        Ok((prefix, remainder, child.as_ref()))
    }

    /// Mutable variant of [`CompoundDictionary::route`].
    fn route_mut<'k>(&mut self, key: &'k str) -> Result<(&'k str, &'k str, &mut D), DictionaryError> {
        let (prefix, remainder) = split_key(key)?;
        let description = self.describe();
        let child = self
            .children
            .get_mut(prefix)
            .ok_or_else(|| DictionaryError::not_found(key, description))?;
        Ok((prefix, remainder, child.as_mut()))
    }
}

/// Fails with `InvalidLanguage` unless `actual` equals `expected`.
fn check_language(side: LanguageSide, expected: &str, actual: &str) -> Result<(), DictionaryError> {
    if expected == actual {
        return Ok(());
    }
    Err(DictionaryError::LanguageMismatch {
        side,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

/// Splits `key` at its first dot.
fn split_key(key: &str) -> Result<(&str, &str), DictionaryError> {
    key.split_once('.')
        .ok_or_else(|| DictionaryError::InvalidKeyFormat { key: key.to_string() })
}

impl<D: Dictionary + ?Sized> Dictionary for CompoundDictionary<D> {
    fn keys(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            self.children
                .iter()
                .flat_map(|(prefix, child)| child.keys().map(move |key| format!("{prefix}.{key}"))),
        )
    }

    fn get(&self, key: &str) -> Result<Box<dyn TranslationValue>, DictionaryError> {
        let (prefix, remainder, child) = self.route(key)?;
        let inner = child.get(remainder)?;
        Ok(Box::new(PrefixedValue::new(prefix, inner)))
    }

    fn has(&self, key: &str) -> Result<bool, DictionaryError> {
        let (_, remainder, child) = self.route(key)?;
        child.has(remainder)
    }

    fn source_language(&self) -> &str {
        &self.source_language
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }

    fn describe(&self) -> String {
        format!(
            "compound {} => {} [{}]",
            self.source_language,
            self.target_language,
            self.prefixes().join(", ")
        )
    }
}

impl WritableDictionary for WritableCompoundDictionary {
    fn add(&mut self, key: &str) -> Result<Box<dyn WritableTranslationValue>, DictionaryError> {
        let (prefix, remainder, child) = self.route_mut(key)?;
        let inner = child.add(remainder)?;
        Ok(Box::new(PrefixedValue::new(prefix, inner)))
    }

    fn remove(&mut self, key: &str) -> Result<(), DictionaryError> {
        let (_, remainder, child) = self.route_mut(key)?;
        child.remove(remainder)
    }

    fn get_writable(
        &mut self,
        key: &str,
    ) -> Result<Box<dyn WritableTranslationValue>, DictionaryError> {
        let (prefix, remainder, child) = self.route_mut(key)?;
        let inner = child.get_writable(remainder)?;
        Ok(Box::new(PrefixedValue::new(prefix, inner)))
    }
}

/// A child's value seen through the compound: same texts, prefixed key.
#[derive(Debug)]
pub struct PrefixedValue<V: ?Sized> {
    /// Prefix of the owning child.
    prefix: String,
    /// Value as the child returned it.
    inner: Box<V>,
}

impl<V: ?Sized> PrefixedValue<V> {
    pub fn new(prefix: impl Into<String>, inner: Box<V>) -> Self {
        Self { prefix: prefix.into(), inner }
    }
}

impl<V: TranslationValue + ?Sized> TranslationValue for PrefixedValue<V> {
    fn key(&self) -> String {
        format!("{}.{}", self.prefix, self.inner.key())
    }

    fn source(&self) -> Option<String> {
        self.inner.source()
    }

    fn target(&self) -> Option<String> {
        self.inner.target()
    }
}

impl<V: WritableTranslationValue + ?Sized> WritableTranslationValue for PrefixedValue<V> {
    fn set_source(&mut self, value: &str) {
        self.inner.set_source(value);
    }

    fn set_target(&mut self, value: &str) {
        self.inner.set_target(value);
    }

    fn clear_source(&mut self) {
        self.inner.clear_source();
    }

    fn clear_target(&mut self) {
        self.inner.clear_target();
    }
}
