// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process environment value source adapter.
//!
//! This module provides an adapter that reads raw values from the environment
//! variables of the running process.

use crate::domain::{ConfigError, ConfigKey, Result};
use crate::ports::Environ;
use std::env::{self, VarError};

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Value source adapter for environment variables.
///
/// Every lookup reads the process environment directly, so the adapter sees
/// variables set after it was created.
///
/// # Priority
///
/// Environment variables have a priority of 2, which means they override
/// secret stores and files (priority 1) but are overridden by explicit
/// overrides (priority 3).
///
/// # Examples
///
/// ```rust
/// use envbind::adapters::EnvVarAdapter;
/// use envbind::ports::Environ;
///
/// let adapter = EnvVarAdapter::new();
/// assert_eq!(adapter.name(), "env");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvVarAdapter {
    _private: (),
}

impl EnvVarAdapter {
    /// Creates a new environment variable adapter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Environ for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn lookup(&self, key: &ConfigKey) -> Result<Option<String>> {
        // Validate input sizes to prevent DoS
        if key.as_str().is_empty() || key.as_str().len() > MAX_ENV_KEY_LEN {
            tracing::debug!(
                "Skipping lookup of invalid environment variable name: key_len={} (max key={})",
                key.as_str().len(),
                MAX_ENV_KEY_LEN
            );
            return Ok(None);
        }

        match env::var(key.as_str()) {
            Ok(value) if value.len() > MAX_ENV_VALUE_LEN => {
                tracing::debug!(
                    "Skipping oversized environment variable {}: value_len={} (max value={})",
                    key,
                    value.len(),
                    MAX_ENV_VALUE_LEN
                );
                Ok(None)
            }
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e @ VarError::NotUnicode(_)) => Err(ConfigError::SourceError {
                source_name: self.name().to_string(),
                message: format!("environment variable {} is not valid unicode", key),
                source: Some(Box::new(e)),
            }),
        }
    }
}
