// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the envbind crate.
//!
//! This example demonstrates:
//! - Declaring a nested configuration struct with tags
//! - Binding it from environment variables under an application prefix
//! - Registered setters (durations) and defaults
//! - Printing the template of every recognized key
//!
//! To run this example:
//! ```bash
//! # Set some environment variables
//! export DEMO_DB_URL="postgres://localhost/demo"
//! export DEMO_DB_POOL_SIZE="16"
//! export DEMO_ALLOWED_HOSTS="localhost,example.com"
//! export DEMO_REQUEST_TIMEOUT="1m 30s"
//!
//! # Run the example
//! cargo run --example basic_usage
//! ```

use envbind::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Default)]
struct Database {
    url: String,
    pool_size: u32,
    replica: Option<String>,
}

configurable!(Database {
    url => "url,required",
    pool_size => "poolSize,default=8",
    replica,
});

#[derive(Debug, Default)]
struct Config {
    database: Database,
    allowed_hosts: Vec<String>,
    request_timeout: Duration,
    labels: HashMap<String, String>,
    signing_key: Vec<u8>,
    debug: bool,
}

configurable!(Config {
    database => "db",
    allowed_hosts => "allowedHosts",
    request_timeout => "requestTimeout,default=30s",
    labels,
    signing_key => "signingKey,encoding=base64",
    debug,
});

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== envbind: Basic Usage ===\n");

    let registry = Registry::with_defaults();
    let binder = Binder::new(&registry, EnvVarAdapter::new()).prefix("demo");

    println!("--- Recognized keys ---");
    print!("{}", binder.document::<Config>()?);

    println!("\n--- Binding ---");
    let mut config = Config::default();
    match binder.load(&mut config) {
        Ok(()) => println!("✓ Configuration loaded:\n{:#?}", config),
        Err(e @ ConfigError::RequiredMissingError { .. }) => {
            println!("✗ {}", e);
            println!("  Set DEMO_DB_URL and run again.");
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
