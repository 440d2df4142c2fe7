// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities shared by the integration tests.

use envbind::adapters::MapEnviron;
use envbind::service::Registry;
use std::time::Duration;

/// Creates a source holding the given key/value pairs.
#[allow(dead_code)]
pub fn environ(pairs: &[(&str, &str)]) -> MapEnviron {
    pairs.iter().copied().collect()
}

/// Creates a source with the given name and priority.
#[allow(dead_code)]
pub fn named_environ(name: &str, priority: u8, pairs: &[(&str, &str)]) -> MapEnviron {
    pairs
        .iter()
        .fold(MapEnviron::named(name, priority), |source, (k, v)| {
            source.with_value(k, *v)
        })
}

/// Creates a registry whose `Duration` setter reads plain seconds.
#[allow(dead_code)]
pub fn seconds_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<Duration, _>(|slot, raw| {
        *slot = Duration::from_secs(raw.trim_end_matches('s').parse()?);
        Ok(())
    });
    registry
}
