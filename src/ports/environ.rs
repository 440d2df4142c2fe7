// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value source trait definition.
//!
//! This module defines the `Environ` trait, the port through which the binder
//! obtains raw string values by key. The process environment is the usual
//! implementation, but any key/value store (a secret manager, a parameter
//! store, a map built in a test) can stand behind it.

use crate::domain::{ConfigKey, Result};

/// A source of raw values keyed by derived configuration keys.
///
/// # Priority
///
/// Each source has a priority value (0-255) used when several sources are
/// stacked in a [`LayeredEnviron`](crate::adapters::LayeredEnviron). Higher
/// values take precedence. The typical priority values are:
///
/// - **3 (highest)**: Explicit overrides
/// - **2**: Environment variables
/// - **1 (lowest)**: Secret stores and files
///
/// # Examples
///
/// ```rust
/// use envbind::ports::Environ;
/// use envbind::domain::{ConfigKey, Result};
///
/// struct Fixed;
///
/// impl Environ for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn priority(&self) -> u8 {
///         1
///     }
///
///     fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
///         Ok((key.as_str() == "PORT").then(|| "8080".to_string()))
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.lookup(&ConfigKey::from("port")).unwrap().as_deref(), Some("8080"));
/// ```
pub trait Environ {
    /// Returns the name of this source, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the priority of this source.
    fn priority(&self) -> u8;

    /// Looks up the raw value for a key.
    ///
    /// Returns `Ok(None)` when the key is not set. An empty string is returned
    /// as-is; the binder treats it like an absent value.
    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>>;
}

impl<E: Environ + ?Sized> Environ for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn priority(&self) -> u8 {
        (**self).priority()
    }

    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
        (**self).lookup(key)
    }
}

impl<E: Environ + ?Sized> Environ for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn priority(&self) -> u8 {
        (**self).priority()
    }

    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
        (**self).lookup(key)
    }
}
