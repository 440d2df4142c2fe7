// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-field declaration tags.
//!
//! A tag is a comma-separated declaration attached to a field:
//!
//! ```text
//! name,default=<literal>,required,encoding=<hex|base64>
//! ```
//!
//! The first segment is always the name override, even when empty. The
//! remaining segments are unordered directives; unknown directive keys are
//! ignored so older binaries accept tags written for newer ones.

use std::fmt;

/// Tag name that excludes a field from binding.
pub const SKIP: &str = "-";

/// Encoding of a byte-sequence field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Hexadecimal, upper or lower case.
    #[default]
    Hex,
    /// Standard padded base64.
    Base64,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Hex => f.write_str("hex"),
            Encoding::Base64 => f.write_str("base64"),
        }
    }
}

/// Reason a declaration tag was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagError(pub String);

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed field declaration.
///
/// # Examples
///
/// ```
/// use envbind::domain::{Encoding, Tag};
///
/// let tag = Tag::parse("blob,encoding=base64,required").unwrap();
/// assert_eq!(tag.name, "blob");
/// assert_eq!(tag.encoding, Some(Encoding::Base64));
/// assert!(tag.required);
/// assert_eq!(tag.default, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    /// Name override; empty means "derive from the field identifier".
    pub name: String,
    /// Literal applied when no external value exists. Never `Some("")`.
    pub default: Option<String>,
    /// Whether a missing value is an error. Ignored when a default is present.
    pub required: bool,
    /// Requested byte encoding, only valid on byte-sequence fields.
    pub encoding: Option<Encoding>,
}

impl Tag {
    /// Parses a declaration string.
    ///
    /// An empty declaration yields an all-default tag.
    pub fn parse(declaration: &str) -> Result<Self, TagError> {
        let mut segments = declaration.split(',');
        let mut tag = Tag {
            name: segments.next().unwrap_or_default().to_string(),
            ..Tag::default()
        };

        for segment in segments {
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (segment, None),
            };
            match (key, value) {
                ("required", None) => tag.required = true,
                ("default", Some(value)) => {
                    tag.default = Some(value.to_string()).filter(|v| !v.is_empty());
                }
                ("encoding", Some("hex")) => tag.encoding = Some(Encoding::Hex),
                ("encoding", Some("base64")) => tag.encoding = Some(Encoding::Base64),
                ("encoding", other) => {
                    return Err(TagError(format!(
                        "unsupported encoding '{}', expected hex or base64",
                        other.unwrap_or_default()
                    )));
                }
                _ => {}
            }
        }

        Ok(tag)
    }

    /// Returns true when the field is excluded from binding.
    pub fn is_skipped(&self) -> bool {
        self.name == SKIP
    }

    /// Returns true when a missing value must fail the bind.
    pub fn is_required(&self) -> bool {
        self.required && self.default.is_none()
    }

    /// The encoding to use for byte sequences.
    pub fn byte_encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }
}
