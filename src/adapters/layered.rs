// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered value source adapter.
//!
//! This module provides [`LayeredEnviron`], which stacks several value sources
//! and answers each lookup from the highest-priority source holding the key.

use crate::domain::{ConfigKey, Result};
use crate::ports::Environ;

/// A stack of value sources queried in priority order.
///
/// Sources are kept sorted by priority, highest first; sources with equal
/// priority keep their insertion order. The first source returning a value
/// wins. A source error aborts the lookup, so a broken source is never
/// silently masked by a lower-priority one.
///
/// # Examples
///
/// ```rust
/// use envbind::adapters::{LayeredEnviron, MapEnviron};
/// use envbind::domain::ConfigKey;
/// use envbind::ports::Environ;
///
/// let layered = LayeredEnviron::new()
///     .with_source(MapEnviron::named("defaults", 1).with_value("PORT", "80"))
///     .with_source(MapEnviron::named("overrides", 3).with_value("PORT", "8080"));
///
/// let value = layered.lookup(&ConfigKey::from("PORT")).unwrap();
/// assert_eq!(value.as_deref(), Some("8080"));
/// ```
#[derive(Default)]
pub struct LayeredEnviron {
    sources: Vec<Box<dyn Environ + Send + Sync>>,
}

impl LayeredEnviron {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a source to the stack.
    pub fn with_source<E: Environ + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.add_source(Box::new(source));
        self
    }

    /// Adds a boxed source to the stack.
    pub fn add_source(&mut self, source: Box<dyn Environ + Send + Sync>) {
        tracing::debug!(
            "Adding value source '{}' with priority {}",
            source.name(),
            source.priority()
        );
        self.sources.push(source);
        self.sort_sources();
    }

    /// Sorts sources by priority (highest first).
    fn sort_sources(&mut self) {
        self.sources.sort_by_key(|b| std::cmp::Reverse(b.priority()));
    }

    /// Returns the source names in query order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true when the stack holds no source.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for LayeredEnviron {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredEnviron")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl Environ for LayeredEnviron {
    fn name(&self) -> &str {
        "layered"
    }

    fn priority(&self) -> u8 {
        self.sources.first().map(|s| s.priority()).unwrap_or(0)
    }

    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
        for source in &self.sources {
            match source.lookup(key)? {
                Some(value) => {
                    tracing::trace!("Key {} found in source '{}'", key, source.name());
                    return Ok(Some(value));
                }
                None => continue,
            }
        }
        Ok(None)
    }
}
