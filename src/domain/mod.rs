// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and pure algorithms.
//!
//! This module contains the declaration tag parser, identifier normalization,
//! the bindable value types with their built-in setters, and the error types.
//! Nothing here performs I/O.

pub mod config_key;
pub mod errors;
pub mod record;
pub mod tag;
pub mod value;

// Re-export commonly used types
pub use config_key::{normalize, ConfigKey};
pub use errors::{BoxError, ConfigError, Result, ValueError};
pub use tag::{Encoding, Tag, TagError};
pub use value::{Element, Kind, SetterFn, Staging, Value};
