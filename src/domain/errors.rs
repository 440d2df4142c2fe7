// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the binding engine.
//!
//! Two layers of errors live here. [`ValueError`] is what an individual setter
//! reports when a raw string cannot be stored into a field. [`ConfigError`] is
//! what the binder hands back to callers: it always names the derived key of the
//! field that failed, and for conversion failures also the raw value attempted.

use thiserror::Error;

/// Boxed error type returned by setters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for binding operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use envbind::domain::errors::ConfigError;
///
/// let error = ConfigError::RequiredMissingError {
///     key: "DATABASE_URL".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required value for key DATABASE_URL");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A field declaration tag is malformed or requests an unsupported encoding.
    #[error("Invalid declaration tag '{tag}' for key {key}: {message}")]
    TagSyntaxError {
        /// The derived key of the field carrying the tag
        key: String,
        /// The raw declaration string
        tag: String,
        /// What is wrong with it
        message: String,
    },

    /// A raw value could not be converted into the field's type.
    #[error("Failed to convert value '{value}' for key {key} to type {target_type}: {source}")]
    ConversionError {
        /// The derived key of the field
        key: String,
        /// The raw value that was attempted
        value: String,
        /// The target type name
        target_type: String,
        /// The underlying setter error
        source: BoxError,
    },

    /// A required field had neither an external value nor a default.
    #[error("Missing required value for key {key}")]
    RequiredMissingError {
        /// The derived key of the field
        key: String,
    },

    /// A field's type has no applicable setter.
    #[error("No setter available for key {key} of type {type_name}")]
    UnsupportedKindError {
        /// The derived key of the field
        key: String,
        /// The field's type name
        type_name: String,
    },

    /// An error occurred in a value source.
    #[error("Value source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },
}

impl ConfigError {
    /// Wraps a setter error with the key and raw value that caused it.
    pub fn conversion(key: &str, value: &str, target_type: &str, source: BoxError) -> Self {
        ConfigError::ConversionError {
            key: key.to_string(),
            value: value.to_string(),
            target_type: target_type.to_string(),
            source,
        }
    }

    /// Returns the derived key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::TagSyntaxError { key, .. }
            | ConfigError::ConversionError { key, .. }
            | ConfigError::RequiredMissingError { key }
            | ConfigError::UnsupportedKindError { key, .. } => Some(key),
            ConfigError::SourceError { .. } => None,
        }
    }
}

/// Errors reported by individual setters.
///
/// These never reach callers directly; the binder boxes them into
/// [`ConfigError::ConversionError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// Integer parse failure.
    #[error("invalid integer '{raw}': {reason}")]
    InvalidInteger {
        /// The offending input
        raw: String,
        /// Why it was rejected
        reason: String,
    },

    /// Float parse failure.
    #[error("invalid float '{raw}': {source}")]
    InvalidFloat {
        /// The offending input
        raw: String,
        /// The underlying parse error
        source: std::num::ParseFloatError,
    },

    /// Hexadecimal decode failure.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Base64 decode failure.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The input is not a well-formed CSV record.
    #[error("invalid list: {0}")]
    InvalidRecord(String),

    /// A map entry lacks the `=` separator.
    #[error("map entry '{0}' is not of the form key=value")]
    InvalidMapEntry(String),

    /// A text-capable type rejected the input.
    #[error("invalid text value: {0}")]
    InvalidText(BoxError),

    /// A JSON-capable type rejected the input.
    #[cfg(feature = "json")]
    #[error("invalid JSON value: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A registered setter was handed a slot of a different type.
    #[error("setter for {expected} applied to a field of another type")]
    SlotMismatch {
        /// The type the setter was registered for
        expected: &'static str,
    },

    /// The field's type has no setter.
    #[error("type {type_name} has no setter")]
    Unsupported {
        /// The field's type name
        type_name: &'static str,
    },
}

/// A specialized Result type for binding operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
