// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory value source adapter.

use crate::domain::{ConfigKey, Result};
use crate::ports::Environ;
use std::collections::HashMap;

/// A value source backed by a map.
///
/// Keys are normalized on insertion, so `with_value("dbHost", ..)` answers
/// lookups of `DB_HOST`. This is useful in tests and for values resolved
/// elsewhere, such as a secret store read at startup.
///
/// # Examples
///
/// ```rust
/// use envbind::adapters::MapEnviron;
/// use envbind::domain::ConfigKey;
/// use envbind::ports::Environ;
///
/// let source = MapEnviron::new().with_value("dbHost", "localhost");
/// let value = source.lookup(&ConfigKey::from("DB_HOST")).unwrap();
/// assert_eq!(value.as_deref(), Some("localhost"));
/// ```
#[derive(Debug, Clone)]
pub struct MapEnviron {
    name: String,
    priority: u8,
    values: HashMap<ConfigKey, String>,
}

impl MapEnviron {
    /// Creates an empty source named `map` with priority 1.
    pub fn new() -> Self {
        Self::named("map", 1)
    }

    /// Creates an empty source with the given name and priority.
    pub fn named(name: impl Into<String>, priority: u8) -> Self {
        Self {
            name: name.into(),
            priority,
            values: HashMap::new(),
        }
    }

    /// Adds a value to the source.
    pub fn with_value(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the priority of the source.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(ConfigKey::from(key.as_ref()), value.into());
    }

    /// Removes a value.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<String> {
        self.values.remove(&ConfigKey::from(key.as_ref()))
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the source holds no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MapEnviron {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for MapEnviron {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (key, value) in iter {
            source.insert(key, value);
        }
        source
    }
}

impl Environ for MapEnviron {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }
}
