//! Name-keyed lookup of builders and providers.

use indexmap::IndexMap;

/// Insertion-ordered map from a registered name to a service.
///
/// Used for every "dispatch by `type` string" seam: definition builders,
/// dictionary builders, job builders and dictionary providers.
#[derive(Debug)]
pub struct Registry<T> {
    /// Services by name.
    entries: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<T> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `service` under `name`, returning the service it replaced.
    pub fn register(&mut self, name: impl Into<String>, service: T) -> Option<T> {
        self.entries.insert(name.into(), service)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
