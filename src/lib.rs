// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture crate binding external values onto configuration
//! structs.
//!
//! Each field of a configuration struct carries a declaration tag such as
//! `"port,required"` or `"ttl,default=30s"`. The binder derives an upper-case
//! key for every field from the struct path, looks the key up in a value
//! source (usually the process environment), converts the raw string to the
//! field's type and writes it in place.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and pure algorithms (`Tag`, `ConfigKey`,
//!   `Value`, errors)
//! - **Ports**: Trait definitions at the seams (`Configurable`, `Environ`)
//! - **Adapters**: Value source implementations (process environment, maps,
//!   layered stacks)
//! - **Service**: The walker, the setter registry and the binder
//!
//! # Features
//!
//! - **Key derivation**: `HTTPServer.baseURL` becomes `HTTP_SERVER_BASE_URL`
//! - **Nesting**: untagged nested structs are flattened into their parent
//! - **Defaults and required fields** declared in the tag
//! - **Custom setters**: register a conversion for any type, durations included
//! - **Self-documentation**: render a `KEY=value` template of every key
//!
//! # Feature Flags
//!
//! - `env`: Enable the process environment adapter (default)
//! - `json`: Enable JSON decoding through `impl_json_value!` (default)
//! - `duration`: Register a humantime `Duration` setter in
//!   `Registry::with_defaults` (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use envbind::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default)]
//! struct Database {
//!     url: String,
//!     pool_size: u32,
//! }
//!
//! configurable!(Database {
//!     url => "url,required",
//!     pool_size => "poolSize,default=8",
//! });
//!
//! #[derive(Debug, Default)]
//! struct Config {
//!     database: Database,
//!     timeout: Duration,
//!     tags: Vec<String>,
//! }
//!
//! configurable!(Config {
//!     database => "db",
//!     timeout => "timeout,default=30s",
//!     tags,
//! });
//!
//! # fn main() -> envbind::domain::Result<()> {
//! let registry = Registry::with_defaults();
//! let environ = MapEnviron::new()
//!     .with_value("DB_URL", "postgres://localhost/app")
//!     .with_value("TAGS", "blue,green");
//!
//! let mut config = Config::default();
//! Binder::new(&registry, environ).load(&mut config)?;
//!
//! assert_eq!(config.database.url, "postgres://localhost/app");
//! assert_eq!(config.database.pool_size, 8);
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.tags, vec!["blue", "green"]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

#[macro_use]
mod macros;

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(feature = "json")]
#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{ConfigError, ConfigKey, Kind, Result, Tag, Value};
    pub use crate::ports::{Configurable, Environ};
    pub use crate::service::{Binder, Documentation, Registry};

    pub use crate::adapters::{LayeredEnviron, MapEnviron};
    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;

    pub use crate::{configurable, impl_text_value};
    #[cfg(feature = "json")]
    pub use crate::impl_json_value;
}
