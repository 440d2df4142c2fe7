// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams of the engine: [`Configurable`] is implemented by
//! the structures being bound, [`Environ`] by the sources raw values come from.

pub mod configurable;
pub mod environ;

// Re-export commonly used types
pub use configurable::Configurable;
pub use environ::Environ;
