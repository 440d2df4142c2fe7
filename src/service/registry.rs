// SPDX-License-Identifier: MIT OR Apache-2.0

//! The setter registry.
//!
//! Registered setters take precedence over every built-in conversion. They let
//! collaborators bind types the engine knows nothing about (durations, custom
//! enumerations, wrapper types) without touching the engine itself.

use crate::domain::{BoxError, SetterFn, ValueError};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

struct Registration {
    type_name: &'static str,
    setter: Box<SetterFn>,
}

/// A table of setters keyed by field type.
///
/// Build the registry once at startup and hand it to every
/// [`Binder`](crate::service::Binder) by reference. The binder borrows it
/// immutably, so all registrations necessarily happen before the first bind.
///
/// # Examples
///
/// ```rust
/// use envbind::service::Registry;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Percent(u8);
///
/// let mut registry = Registry::new();
/// registry.register::<Percent, _>(|slot, raw| {
///     let value: u8 = raw.trim_end_matches('%').parse()?;
///     *slot = Percent(value);
///     Ok(())
/// });
///
/// assert!(registry.contains::<Percent>());
/// ```
#[derive(Default)]
pub struct Registry {
    setters: HashMap<TypeId, Registration>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }

    /// Creates a registry with the bundled setters.
    ///
    /// With the `duration` feature this registers a
    /// [`std::time::Duration`] setter accepting humantime syntax such as
    /// `1m`, `12345s` or `1h 30m`.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "duration")]
        registry.register::<std::time::Duration, _>(|slot, raw| {
            *slot = humantime::parse_duration(raw)?;
            Ok(())
        });

        registry
    }

    /// Registers the setter for fields of type `T`.
    ///
    /// The setter also applies to `Option<T>` fields, which are only set to
    /// `Some` after it succeeds. Registering the same type twice replaces the
    /// earlier setter.
    pub fn register<T, F>(&mut self, setter: F) -> &mut Self
    where
        T: Any,
        F: Fn(&mut T, &str) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let erased = move |slot: &mut dyn Any, raw: &str| -> Result<(), BoxError> {
            match slot.downcast_mut::<T>() {
                Some(slot) => setter(slot, raw),
                None => Err(Box::new(ValueError::SlotMismatch {
                    expected: type_name::<T>(),
                })),
            }
        };

        let previous = self.setters.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: type_name::<T>(),
                setter: Box::new(erased),
            },
        );

        if previous.is_some() {
            tracing::debug!("Replaced setter for type {}", type_name::<T>());
        } else {
            tracing::debug!("Registered setter for type {}", type_name::<T>());
        }

        self
    }

    /// Returns true when a setter is registered for `T`.
    pub fn contains<T: Any>(&self) -> bool {
        self.setters.contains_key(&TypeId::of::<T>())
    }

    /// Looks up the setter for a type.
    pub fn lookup(&self, type_id: TypeId) -> Option<&SetterFn> {
        self.setters.get(&type_id).map(|r| r.setter.as_ref())
    }

    /// Returns the number of registered setters.
    pub fn len(&self) -> usize {
        self.setters.len()
    }

    /// Returns true when no setter is registered.
    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.setters.values().map(|r| r.type_name).collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("types", &names).finish()
    }
}
