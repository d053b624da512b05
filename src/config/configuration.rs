//! Registry of the configured dictionaries and jobs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{
    Rc,
    Weak,
};

use indexmap::IndexMap;

use super::{
    ConfigError,
    Definition,
};

/// Definitions by name, in configuration order.
#[derive(Debug, Default)]
struct Definitions {
    /// Job definitions.
    jobs: IndexMap<String, Rc<Definition>>,
    /// Dictionary definitions.
    dictionaries: IndexMap<String, Rc<Definition>>,
}

/// Named job and dictionary definitions, in registration order.
///
/// Cloning yields another handle on the same registry. Definitions that extend
/// configured entries keep a [`ConfigurationRef`] and look them up on access.
#[derive(Clone, Default)]
pub struct Configuration {
    /// Shared with every [`ConfigurationRef`] handed out.
    inner: Rc<RefCell<Definitions>>,
}

impl Configuration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_job(&self, name: &str) -> bool {
        self.inner.borrow().jobs.contains_key(name)
    }

    /// # Errors
    /// `JobNotFound` for unknown names.
    pub fn job(&self, name: &str) -> Result<Rc<Definition>, ConfigError> {
        self.inner
            .borrow()
            .jobs
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::JobNotFound(name.to_string()))
    }

    /// Registers a job under its name, replacing any previous one.
    pub fn set_job(&self, job: Definition) {
        self.inner.borrow_mut().jobs.insert(job.name().to_string(), Rc::new(job));
    }

    #[must_use]
    pub fn job_names(&self) -> Vec<String> {
        self.inner.borrow().jobs.keys().cloned().collect()
    }

    #[must_use]
    pub fn has_dictionary(&self, name: &str) -> bool {
        self.inner.borrow().dictionaries.contains_key(name)
    }

    /// # Errors
    /// `DictionaryNotFound` for unknown names.
    pub fn dictionary(&self, name: &str) -> Result<Rc<Definition>, ConfigError> {
        self.inner
            .borrow()
            .dictionaries
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::DictionaryNotFound(name.to_string()))
    }

    /// Registers a dictionary under its name, replacing any previous one.
    pub fn set_dictionary(&self, dictionary: Definition) {
        self.inner
            .borrow_mut()
            .dictionaries
            .insert(dictionary.name().to_string(), Rc::new(dictionary));
    }

    #[must_use]
    pub fn dictionary_names(&self) -> Vec<String> {
        self.inner.borrow().dictionaries.keys().cloned().collect()
    }

    /// Non-owning handle for definitions referring back to this configuration.
    #[must_use]
    pub fn downgrade(&self) -> ConfigurationRef {
        ConfigurationRef(Rc::downgrade(&self.inner))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("jobs", &self.job_names())
            .field("dictionaries", &self.dictionary_names())
            .finish()
    }
}

/// Weak handle on a [`Configuration`].
#[derive(Clone)]
pub struct ConfigurationRef(Weak<RefCell<Definitions>>);

impl ConfigurationRef {
    /// # Errors
    /// `ConfigurationDropped` when every [`Configuration`] handle is gone.
    pub fn upgrade(&self) -> Result<Configuration, ConfigError> {
        self.0
            .upgrade()
            .map(|inner| Configuration { inner })
            .ok_or(ConfigError::ConfigurationDropped)
    }
}

impl fmt::Debug for ConfigurationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigurationRef")
    }
}
