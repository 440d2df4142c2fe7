// SPDX-License-Identifier: MIT OR Apache-2.0

//! The binder.
//!
//! This module provides [`Binder`], which walks a [`Configurable`] target,
//! looks every field up in a value source and applies the resolved setter.
//! It also produces the [`Documentation`] template for a target type.

use crate::domain::{ConfigError, Result};
use crate::ports::{Configurable, Environ};
use crate::service::docs::{short_type_name, DocEntry, Documentation};
use crate::service::walker::{FieldDescriptor, Fields};
use crate::service::Registry;

/// Binds external values onto configuration structs.
///
/// Binding is a single synchronous pass meant to run once at startup, before
/// the target is shared. It is fail-fast: the first error aborts the pass and
/// the target may be left partially written, so callers should treat it as
/// unusable.
///
/// # Examples
///
/// ```rust
/// use envbind::adapters::MapEnviron;
/// use envbind::configurable;
/// use envbind::service::{Binder, Registry};
///
/// #[derive(Debug, Default)]
/// struct Config {
///     host: String,
///     port: u16,
///     ptr: Option<i32>,
/// }
///
/// configurable!(Config {
///     host => "host,default=localhost",
///     port => "port,required",
///     ptr,
/// });
///
/// # fn main() -> envbind::domain::Result<()> {
/// let registry = Registry::with_defaults();
/// let environ = MapEnviron::new().with_value("MYAPP_PORT", "8080");
/// let binder = Binder::new(&registry, environ).prefix("myapp");
///
/// let mut config = Config::default();
/// binder.load(&mut config)?;
///
/// assert_eq!(config.host, "localhost");
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.ptr, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Binder<'r, E> {
    registry: &'r Registry,
    environ: E,
    prefix: Option<String>,
    strict_kinds: bool,
}

impl<'r, E: Environ> Binder<'r, E> {
    /// Creates a binder reading from `environ`.
    pub fn new(registry: &'r Registry, environ: E) -> Self {
        Self {
            registry,
            environ,
            prefix: None,
            strict_kinds: false,
        }
    }

    /// Sets an application prefix prepended to every derived key.
    ///
    /// The prefix is normalized together with the field path, so `myApp`
    /// turns a `port` field into `MY_APP_PORT`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets whether fields without an applicable setter fail the bind.
    ///
    /// Disabled by default: such fields are skipped so that they can coexist
    /// with bindable ones.
    pub fn strict_kinds(mut self, enabled: bool) -> Self {
        self.strict_kinds = enabled;
        self
    }

    /// Returns the value source.
    pub fn environ(&self) -> &E {
        &self.environ
    }

    /// Walks `target` and returns its field descriptors without binding.
    pub fn fields<'t, C>(&'t self, target: &'t mut C) -> Result<Vec<FieldDescriptor<'t>>>
    where
        C: Configurable + ?Sized,
    {
        Fields::walk(self.registry, self.prefix.iter().cloned().collect(), target)
    }

    /// Binds every field of `target` from the value source.
    ///
    /// For each field, in declaration order: a non-empty value from the source
    /// is applied; otherwise the tag's default is applied; otherwise a
    /// required field fails with [`ConfigError::RequiredMissingError`];
    /// otherwise the field is left untouched.
    ///
    /// An unset `Option` of a nested struct is only allocated when the source
    /// holds a non-empty value for at least one of its keys. Without one, its
    /// defaults are not applied and its required fields are not enforced.
    pub fn load<C: Configurable + ?Sized>(&self, target: &mut C) -> Result<()> {
        let descriptors = self.fields(target)?;
        tracing::debug!(
            "Binding {} fields from source '{}'",
            descriptors.len(),
            self.environ.name()
        );

        for mut descriptor in descriptors {
            self.bind(&mut descriptor)?;
        }

        Ok(())
    }

    /// Binds one descriptor. Returns true when a value from the source was
    /// applied.
    fn bind(&self, descriptor: &mut FieldDescriptor<'_>) -> Result<bool> {
        let key = descriptor.key().clone();

        if descriptor.is_staged() {
            return self.bind_staged(descriptor);
        }

        if descriptor.is_unsupported() {
            if self.strict_kinds {
                return Err(ConfigError::UnsupportedKindError {
                    key: key.into_string(),
                    type_name: short_type_name(descriptor.type_name()),
                });
            }
            tracing::debug!(
                "Skipping key {}: no setter for type {}",
                key,
                descriptor.type_name()
            );
            return Ok(false);
        }

        let found = self.environ.lookup(&key)?.filter(|v| !v.is_empty());
        let sourced = found.is_some();
        let (raw, origin) = match found {
            Some(raw) => (raw, self.environ.name()),
            None => match descriptor.tag().default.clone() {
                Some(default) => (default, "default"),
                None if descriptor.tag().is_required() => {
                    return Err(ConfigError::RequiredMissingError {
                        key: key.into_string(),
                    });
                }
                None => {
                    tracing::trace!("No value for key {}", key);
                    return Ok(false);
                }
            },
        };

        descriptor.apply(&raw).map_err(|e| {
            ConfigError::conversion(
                key.as_str(),
                &raw,
                &short_type_name(descriptor.type_name()),
                e,
            )
        })?;
        tracing::debug!("Bound key {} from {}", key, origin);

        Ok(sourced)
    }

    fn bind_staged(&self, descriptor: &mut FieldDescriptor<'_>) -> Result<bool> {
        let key = descriptor.key().clone();
        let stored = descriptor.stage(self.registry, &mut |members| {
            if !self.any_value(members)? {
                return Ok(false);
            }
            for member in members.iter_mut() {
                self.bind(member)?;
            }
            Ok(true)
        })?;

        if stored {
            tracing::debug!("Allocated {} for the values under it", descriptor.type_name());
        } else {
            tracing::trace!("No values under key {}", key);
        }
        Ok(stored)
    }

    /// Returns true when the source holds a non-empty value for any member.
    fn any_value(&self, members: &mut [FieldDescriptor<'_>]) -> Result<bool> {
        for member in members.iter_mut() {
            if member.is_staged() {
                let mut found = false;
                member.stage(self.registry, &mut |nested| {
                    found = self.any_value(nested)?;
                    Ok(false)
                })?;
                if found {
                    return Ok(true);
                }
            } else if !member.is_unsupported()
                && matches!(self.environ.lookup(member.key())?, Some(v) if !v.is_empty())
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Produces the template of every key recognized for `C`.
    ///
    /// The walk runs over `C::default()`, so no values need to be present.
    pub fn document<C: Configurable + Default>(&self) -> Result<Documentation> {
        let mut target = C::default();
        let mut descriptors = self.fields(&mut target)?;
        let mut entries = Vec::with_capacity(descriptors.len());
        self.document_into(&mut descriptors, &mut entries)?;
        Ok(Documentation::new(entries))
    }

    fn document_into(
        &self,
        descriptors: &mut [FieldDescriptor<'_>],
        entries: &mut Vec<DocEntry>,
    ) -> Result<()> {
        for descriptor in descriptors.iter_mut() {
            if descriptor.is_staged() {
                descriptor.stage(self.registry, &mut |members| {
                    self.document_into(members, entries)?;
                    Ok(false)
                })?;
            } else {
                entries.push(DocEntry::from_descriptor(descriptor));
            }
        }
        Ok(())
    }
}
