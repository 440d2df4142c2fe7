// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the binding engine.
//!
//! The [`Registry`] holds custom setters, the walker flattens a struct tree into
//! field descriptors, and the [`Binder`] resolves each descriptor against a
//! value source.

pub mod binder;
pub mod docs;
pub mod registry;
pub mod walker;

// Re-export commonly used types
pub use binder::Binder;
pub use docs::{DocEntry, Documentation};
pub use registry::Registry;
pub use walker::{FieldDescriptor, Fields};
