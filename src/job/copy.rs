//! Synchronization of one dictionary into another.

use regex::Regex;
use tracing::Level;

use super::TranslationJob;
use crate::config::ConfigError;
use crate::dictionary::{
    Dictionary,
    TranslationValue,
    WritableDictionary,
    WritableTranslationValue,
};
use crate::error::Error;
use crate::logging::{
    JobLogger,
    SharedLogger,
};

/// Whether a job overwrites existing values in the target dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyPolicy {
    DoNotCopy,
    Copy,
    #[default]
    CopyIfEmpty,
}

/// A key filter; keys matching it are not copied.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Expression as configured.
    expression: String,
    /// Compiled pattern.
    regex: Regex,
}

impl Filter {
    /// Compiles `expression`.
    ///
    /// An expression enclosed in the same delimiter character on both ends
    /// (`/^skip\./`, `#foo#`) has the delimiters stripped; anything else is
    /// used as is and reported as `/<expression>/`.
    ///
    /// # Errors
    /// `InvalidFilter` when the expression is not a valid regular expression.
    pub fn new(expression: &str) -> Result<Self, ConfigError> {
        let (expression, pattern) = match delimited(expression) {
            Some(pattern) => (expression.to_string(), pattern),
            None => (format!("/{expression}/"), expression),
        };
        let regex = Regex::new(pattern)
            .map_err(|source| ConfigError::InvalidFilter { expression: expression.clone(), source })?;

        Ok(Self { expression, regex })
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Inner pattern when `expression` is wrapped in the same non-alphanumeric delimiter on both ends.
fn delimited(expression: &str) -> Option<&str> {
    let mut chars = expression.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    if first != last || first.is_alphanumeric() || first.is_whitespace() || first == '\\' {
        return None;
    }
    expression.get(first.len_utf8()..expression.len() - last.len_utf8())
}

/// Copies keys and values from a source dictionary into a target dictionary.
///
/// Keys with an empty source text are never copied. Existing values are
/// overwritten according to the [`CopyPolicy`] of each side.
#[derive(Debug)]
pub struct CopyDictionaryJob {
    /// Dictionary keys are read from.
    source: Box<dyn Dictionary>,
    /// Dictionary keys are copied into.
    target: Box<dyn WritableDictionary>,
    /// How source texts are copied.
    copy_source: CopyPolicy,
    /// How target texts are copied.
    copy_target: CopyPolicy,
    /// Removes target keys missing from the source.
    remove_obsolete: bool,
    /// Default for runs without an explicit dry-run flag.
    dry_run: bool,
    /// Keys matching any filter are skipped.
    filters: Vec<Filter>,
    /// Receives change messages.
    logger: SharedLogger,
}

impl CopyDictionaryJob {
    #[must_use]
    pub fn new(
        source: Box<dyn Dictionary>,
        target: Box<dyn WritableDictionary>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            source,
            target,
            copy_source: CopyPolicy::default(),
            copy_target: CopyPolicy::default(),
            remove_obsolete: false,
            dry_run: false,
            filters: Vec::new(),
            logger,
        }
    }

    pub const fn set_copy_source(&mut self, policy: CopyPolicy) -> &mut Self {
        self.copy_source = policy;
        self
    }

    #[must_use]
    pub const fn copy_source(&self) -> CopyPolicy {
        self.copy_source
    }

    pub const fn set_copy_target(&mut self, policy: CopyPolicy) -> &mut Self {
        self.copy_target = policy;
        self
    }

    #[must_use]
    pub const fn copy_target(&self) -> CopyPolicy {
        self.copy_target
    }

    pub const fn set_remove_obsolete(&mut self, remove_obsolete: bool) -> &mut Self {
        self.remove_obsolete = remove_obsolete;
        self
    }

    #[must_use]
    pub const fn remove_obsolete(&self) -> bool {
        self.remove_obsolete
    }

    pub const fn set_dry_run(&mut self, dry_run: bool) -> &mut Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// # Errors
    /// `InvalidFilter` for an invalid expression; the filter list is unchanged.
    pub fn add_filter(&mut self, expression: &str) -> Result<&mut Self, ConfigError> {
        self.filters.push(Filter::new(expression)?);
        Ok(self)
    }

    /// Replaces all filters.
    ///
    /// # Errors
    /// `InvalidFilter` for the first invalid expression; the filter list is
    /// unchanged.
    pub fn set_filters<S: AsRef<str>>(&mut self, expressions: &[S]) -> Result<&mut Self, ConfigError> {
        self.filters = expressions
            .iter()
            .map(|expression| Filter::new(expression.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    #[must_use]
    pub fn filters(&self) -> Vec<&str> {
        self.filters.iter().map(Filter::expression).collect()
    }
}

impl TranslationJob for CopyDictionaryJob {
    /// Runs the synchronization; `dry_run` overrides the job setting for this
    /// call only.
    fn run(&mut self, dry_run: Option<bool>) -> Result<(), Error> {
        let dry_run = dry_run.unwrap_or(self.dry_run);
        let mut pass = Pass {
            source: self.source.as_ref(),
            target: self.target.as_mut(),
            copy_source: self.copy_source,
            copy_target: self.copy_target,
            filters: &self.filters,
            logger: self.logger.as_ref(),
            dry_run,
            level: if dry_run { Level::INFO } else { Level::DEBUG },
        };

        pass.copy_keys()?;
        if self.remove_obsolete {
            pass.remove_obsolete()?;
        }
        Ok(())
    }
}

/// One run of a [`CopyDictionaryJob`].
struct Pass<'a> {
    /// Dictionary keys are read from.
    source: &'a dyn Dictionary,
    /// Dictionary keys are copied into.
    target: &'a mut dyn WritableDictionary,
    /// How source texts are copied.
    copy_source: CopyPolicy,
    /// How target texts are copied.
    copy_target: CopyPolicy,
    /// Keys matching any filter are skipped.
    filters: &'a [Filter],
    /// Receives change messages.
    logger: &'a dyn JobLogger,
    /// Only logs when set.
    dry_run: bool,
    /// Level of routine messages; raised in dry runs.
    level: Level,
}

impl Pass<'_> {
    /// Copies every source key that passes the filters.
    fn copy_keys(&mut self) -> Result<(), Error> {
        let source = self.source;
        for key in source.keys() {
            if self.is_filtered(&key) {
                continue;
            }
            self.copy_key(&key)?;
        }
        Ok(())
    }

    /// `true` when a filter matches `key`.
    fn is_filtered(&self, key: &str) -> bool {
        let Some(filter) = self.filters.iter().find(|filter| filter.is_match(key)) else {
            return false;
        };
        self.logger.log(
            Level::DEBUG,
            "\"{key}\" is filtered by \"{filter}\"",
            &[("key", Some(key)), ("filter", Some(filter.expression()))],
        );
        true
    }

    /// Copies one key, adding it to the target when missing.
    fn copy_key(&mut self, key: &str) -> Result<(), Error> {
        let source = self.source.get(key)?;
        if source.is_source_empty() {
            self.logger.log(
                Level::DEBUG,
                "{key}: Is empty in source language and therefore skipped.",
                &[("key", Some(key))],
            );
            return Ok(());
        }

        if !self.target.has(key)? {
            self.logger.log(self.level, "Adding key {key}.", &[("key", Some(key))]);
            if self.dry_run {
                return Ok(());
            }
            self.target.add(key)?;
        }

        let mut target = self.target.get_writable(key)?;
        self.copy_source(source.as_ref(), target.as_mut());
        self.copy_target(source.as_ref(), target.as_mut());
        Ok(())
    }

    /// Applies the source policy to one value.
    fn copy_source(&self, source: &dyn TranslationValue, target: &mut dyn WritableTranslationValue) {
        if self.copy_source == CopyPolicy::DoNotCopy {
            return;
        }

        let key = target.key();
        let old = target.source();
        let new = source.source();
        let context = [("key", Some(key.as_str())), ("old", old.as_deref()), ("new", new.as_deref())];

        if old == new {
            self.logger.log(self.level, "{key}: Source is same, no need to update.", &context);
            return;
        }
        if self.copy_source == CopyPolicy::CopyIfEmpty && !target.is_source_empty() {
            self.logger.log(self.level, "{key}: Source is not empty, no need to update.", &context);
            return;
        }

        self.logger.log(Level::INFO, "{key}: Updating source value.", &context);
        if self.dry_run {
            return;
        }
        match new.as_deref() {
            Some(value) => target.set_source(value),
            None => target.clear_source(),
        }
    }

    /// Applies the target policy to one value.
    fn copy_target(&self, source: &dyn TranslationValue, target: &mut dyn WritableTranslationValue) {
        if self.copy_target == CopyPolicy::DoNotCopy {
            return;
        }

        let key = target.key();
        let old = target.target();
        let new = source.target();
        let context = [("key", Some(key.as_str())), ("old", old.as_deref()), ("new", new.as_deref())];

        if old == new || (target.is_target_empty() && source.is_target_empty()) {
            self.logger.log(self.level, "{key}: Target is same, no need to update.", &context);
            return;
        }
        if self.copy_target == CopyPolicy::CopyIfEmpty && !target.is_target_empty() {
            self.logger.log(self.level, "{key}: Target is not empty, no need to update.", &context);
            return;
        }

        self.logger.log(Level::INFO, "{key}: Updating target value.", &context);
        if self.dry_run {
            return;
        }
        match new.as_deref() {
            Some(value) => target.set_target(value),
            None => target.clear_target(),
        }
    }

    /// Removes target keys the source does not have.
    fn remove_obsolete(&mut self) -> Result<(), Error> {
        let keys: Vec<String> = self.target.keys().collect();
        for key in keys {
            if self.source.has(&key)? && !self.source.get(&key)?.is_source_empty() {
                continue;
            }
            self.logger.log(self.level, "Removing obsolete {key}.", &[("key", Some(key.as_str()))]);
            if self.dry_run {
                continue;
            }
            self.target.remove(&key)?;
        }
        Ok(())
    }
}
