// SPDX-License-Identifier: MIT OR Apache-2.0

//! The struct walker.
//!
//! [`Fields`] receives the fields of a [`Configurable`] struct one at a time,
//! resolves how each one is set, and flattens nested structs into a single
//! ordered list of [`FieldDescriptor`]s. Descriptors hold the mutable borrow of
//! their field, so binding writes straight into the caller's structure.

use crate::domain::{
    BoxError, ConfigError, ConfigKey, Kind, Result, SetterFn, Staging, Tag, Value, ValueError,
};
use crate::ports::Configurable;
use crate::service::Registry;
use std::collections::HashSet;

/// How a descriptor's field is written.
enum Binding<'a> {
    /// Through a setter from the registry.
    Registered {
        slot: &'a mut dyn Value,
        setter: &'a SetterFn,
    },
    /// Through the field type's own kind or capability setter.
    Builtin(&'a mut dyn Value),
    /// An unset optional struct, walked and bound into a fresh value.
    Staged {
        slot: &'a mut dyn Staging,
        path: Vec<String>,
    },
    /// No setter applies.
    Unsupported,
}

/// One bindable field, resolved by the walker.
pub struct FieldDescriptor<'a> {
    key: ConfigKey,
    tag: Tag,
    kind: Kind,
    type_name: &'static str,
    binding: Binding<'a>,
}

impl FieldDescriptor<'_> {
    /// The derived lookup key.
    pub fn key(&self) -> &ConfigKey {
        &self.key
    }

    /// The parsed declaration tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// The structural kind of the field type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The field's type name, with `Option` unwrapped.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true when the field is set through a registered setter.
    pub fn is_registered(&self) -> bool {
        matches!(self.binding, Binding::Registered { .. })
    }

    /// Returns true when no setter applies to the field.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.binding, Binding::Unsupported)
    }

    /// Returns true for an unset optional struct.
    ///
    /// Such a descriptor stands for every field of the struct. Its key is the
    /// prefix those fields derive their own keys from.
    pub fn is_staged(&self) -> bool {
        matches!(self.binding, Binding::Staged { .. })
    }

    /// Converts `raw` and stores it into the field.
    pub fn apply(&mut self, raw: &str) -> std::result::Result<(), BoxError> {
        match &mut self.binding {
            Binding::Registered { slot, setter } => slot.set_with(*setter, raw),
            Binding::Builtin(slot) => slot.set(raw, &self.tag),
            Binding::Staged { .. } | Binding::Unsupported => {
                Err(Box::new(ValueError::Unsupported {
                    type_name: self.type_name,
                }))
            }
        }
    }

    /// Walks a fresh value of an unset optional struct.
    ///
    /// `visit` receives the descriptors of the fresh value. The value is
    /// stored into the field only when `visit` returns true. Returns false for
    /// any other descriptor.
    pub fn stage(
        &mut self,
        registry: &Registry,
        visit: &mut dyn FnMut(&mut [FieldDescriptor<'_>]) -> Result<bool>,
    ) -> Result<bool> {
        match &mut self.binding {
            Binding::Staged { slot, path } => slot.stage(&mut |nested| {
                let mut members = Fields::walk(registry, path.clone(), nested)?;
                visit(members.as_mut_slice())
            }),
            _ => Ok(false),
        }
    }
}

impl std::fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("registered", &self.is_registered())
            .field("staged", &self.is_staged())
            .finish()
    }
}

/// Collects the field descriptors of a struct tree.
///
/// A `Fields` is created by the [`Binder`](crate::service::Binder) and passed
/// to [`Configurable::describe`]. Errors in declaration tags are recorded and
/// reported by [`Fields::finish`]; once an error is recorded, further fields
/// are ignored.
pub struct Fields<'a> {
    registry: &'a Registry,
    prefix: Vec<String>,
    descriptors: Vec<FieldDescriptor<'a>>,
    error: Option<ConfigError>,
}

impl<'a> Fields<'a> {
    /// Creates a walker rooted at `prefix`.
    pub fn new(registry: &'a Registry, prefix: Vec<String>) -> Self {
        Self {
            registry,
            prefix,
            descriptors: Vec::new(),
            error: None,
        }
    }

    /// Walks a struct, producing its descriptors.
    pub fn walk<C: Configurable + ?Sized>(
        registry: &'a Registry,
        prefix: Vec<String>,
        target: &'a mut C,
    ) -> Result<Vec<FieldDescriptor<'a>>> {
        let mut fields = Self::new(registry, prefix);
        target.describe(&mut fields);
        fields.finish()
    }

    /// Registers one field.
    ///
    /// `ident` is the field identifier, used as the name when the tag does not
    /// override it. `tag` is the raw declaration string.
    pub fn field<T: Value>(&mut self, ident: &str, tag: &str, slot: &'a mut T) {
        if self.error.is_some() {
            return;
        }

        let declaration = tag;
        let kind = T::kind();
        let tag = match Tag::parse(declaration) {
            Ok(tag) => tag,
            Err(e) => {
                let name = declaration.split(',').next().unwrap_or_default();
                let mut path = self.prefix.clone();
                path.push(if name.is_empty() { ident } else { name }.to_string());
                self.fail(&path, declaration, e.to_string());
                return;
            }
        };

        if tag.is_skipped() {
            tracing::trace!("Skipping field '{}'", ident);
            return;
        }

        let mut path = self.prefix.clone();
        if !tag.name.is_empty() {
            path.push(tag.name.clone());
        } else if kind != Kind::Struct {
            path.push(ident.to_string());
        }

        if tag.encoding.is_some() && kind != Kind::Bytes {
            self.fail(
                &path,
                declaration,
                "encoding is only valid on byte-sequence fields".to_string(),
            );
            return;
        }

        let registered = self.registry.lookup(T::target_type());
        let unset = kind == Kind::Struct && slot.staging().is_some();
        let binding = match (registered, kind) {
            (Some(setter), _) => Binding::Registered { slot, setter },
            (None, Kind::Struct) if unset => match slot.staging() {
                Some(staging) => {
                    // Tag errors inside the unset struct must surface now.
                    let registry = self.registry;
                    let checked = staging.stage(&mut |nested| {
                        Fields::walk(registry, path.clone(), nested).map(|_| false)
                    });
                    if let Err(e) = checked {
                        self.error = Some(e);
                        return;
                    }
                    Binding::Staged {
                        slot: staging,
                        path: path.clone(),
                    }
                }
                None => Binding::Unsupported,
            },
            (None, Kind::Struct) => match slot.configurable() {
                Some(nested) => {
                    let parent = std::mem::replace(&mut self.prefix, path);
                    nested.describe(self);
                    self.prefix = parent;
                    return;
                }
                None => Binding::Unsupported,
            },
            (None, Kind::Unsupported) => Binding::Unsupported,
            (None, _) => Binding::Builtin(slot),
        };

        let descriptor = FieldDescriptor {
            key: ConfigKey::from_path(&path),
            tag,
            kind,
            type_name: T::target_type_name(),
            binding,
        };
        tracing::trace!(
            "Resolved field '{}' as {} ({:?})",
            ident,
            descriptor.key,
            descriptor.kind
        );
        self.descriptors.push(descriptor);
    }

    fn fail(&mut self, path: &[String], declaration: &str, message: String) {
        self.error = Some(ConfigError::TagSyntaxError {
            key: ConfigKey::from_path(path).into_string(),
            tag: declaration.to_string(),
            message,
        });
    }

    fn warn_duplicate_keys(&self) {
        let mut seen = HashSet::new();
        for descriptor in &self.descriptors {
            if !seen.insert(descriptor.key.as_str()) {
                tracing::warn!(
                    "Key {} is derived by more than one field; all of them bind from it",
                    descriptor.key
                );
            }
        }
    }

    /// Returns the collected descriptors, or the first tag error.
    pub fn finish(self) -> Result<Vec<FieldDescriptor<'a>>> {
        if let Some(error) = self.error {
            return Err(error);
        }

        self.warn_duplicate_keys();
        Ok(self.descriptors)
    }
}
