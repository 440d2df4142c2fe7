// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing value source implementations.
//!
//! This module contains concrete implementations of the
//! [`Environ`](crate::ports::Environ) port defined in the ports layer.

#[cfg(feature = "env")]
pub mod env_var;
pub mod layered;
pub mod memory;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
pub use layered::LayeredEnviron;
pub use memory::MapEnviron;
