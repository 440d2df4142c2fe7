// SPDX-License-Identifier: MIT OR Apache-2.0

//! Self-documentation of recognized keys.

use crate::domain::{ConfigError, Kind};
use crate::service::walker::FieldDescriptor;
use std::fmt;

/// One documented key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    /// The derived lookup key.
    pub key: String,
    /// The default value, or a `# ...` placeholder describing the type.
    pub value: String,
    /// The short type name of the field.
    pub type_name: String,
    /// Whether the field must be provided.
    pub required: bool,
    /// Whether no setter applies to the field.
    pub unsupported: bool,
}

impl DocEntry {
    pub(crate) fn from_descriptor(descriptor: &FieldDescriptor<'_>) -> Self {
        let tag = descriptor.tag();
        let type_name = short_type_name(descriptor.type_name());
        let unsupported = descriptor.is_unsupported();
        let required = tag.is_required();

        let value = match &tag.default {
            Some(default) if !unsupported => default.clone(),
            _ => {
                let hint = match descriptor.kind() {
                    _ if unsupported => format!("{type_name} (unsupported)"),
                    Kind::Bytes => format!("{} bytes", tag.byte_encoding()),
                    _ => type_name.clone(),
                };
                if required {
                    format!("# {hint}, required")
                } else {
                    format!("# {hint}")
                }
            }
        };

        Self {
            key: descriptor.key().to_string(),
            value,
            type_name,
            required,
            unsupported,
        }
    }
}

/// A `KEY=value` template of every key recognized for a type.
///
/// Renders as newline-terminated lines sorted by key. Keys with a default show
/// the default; the others show a `#` placeholder naming the expected type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    entries: Vec<DocEntry>,
}

impl Documentation {
    /// Creates documentation from entries, sorting them by key.
    pub fn new(mut entries: Vec<DocEntry>) -> Self {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Self { entries }
    }

    /// Returns the entries in key order.
    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    /// Returns the entry for a key.
    pub fn get(&self, key: &str) -> Option<&DocEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Returns an error for every field no setter applies to.
    pub fn unsupported(&self) -> Vec<ConfigError> {
        self.entries
            .iter()
            .filter(|e| e.unsupported)
            .map(|e| ConfigError::UnsupportedKindError {
                key: e.key.clone(),
                type_name: e.type_name.clone(),
            })
            .collect()
    }

    /// Returns the number of documented keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no key is documented.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns a type name with module paths removed, e.g. `Vec<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

impl fmt::Display for Documentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}={}", entry.key, entry.value)?;
        }
        Ok(())
    }
}
