// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for binding values onto configuration structs.
//!
//! These tests exercise the public API end to end: declaration tags, key
//! derivation, built-in and registered setters, and error reporting.

mod common;

use common::{environ, seconds_registry};
use envbind::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq)]
struct Embedded {
    embedded: bool,
}

configurable!(Embedded { embedded });

#[derive(Debug, Default, Clone, PartialEq)]
struct Scenario {
    embedded: Embedded,
    required: String,
    some_slice: Vec<String>,
    custom_parser: Duration,
    map: HashMap<String, String>,
    ptr: Option<i32>,
}

configurable!(Scenario {
    embedded => ",",
    required => "req,required",
    some_slice => "sliced",
    custom_parser => "custom,default=12345s",
    map,
    ptr,
});

fn scenario_environ() -> MapEnviron {
    environ(&[
        ("EMBEDDED", "true"),
        ("REQ", "imhere"),
        ("SLICED", r#""a","b","c""#),
        ("CUSTOM", "1m"),
        ("MAP", r#"["a=b","c=d"]"#),
        ("PTR", "123"),
    ])
}

fn duration_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<Duration, _>(|slot, raw| {
        *slot = match raw.strip_suffix('m') {
            Some(minutes) => Duration::from_secs(minutes.parse::<u64>()? * 60),
            None => Duration::from_secs(raw.trim_end_matches('s').parse()?),
        };
        Ok(())
    });
    registry
}

#[test]
fn test_end_to_end_scenario() {
    let registry = duration_registry();
    let mut config = Scenario::default();

    Binder::new(&registry, scenario_environ())
        .load(&mut config)
        .unwrap();

    assert!(config.embedded.embedded);
    assert_eq!(config.required, "imhere");
    assert_eq!(config.some_slice, vec!["a", "b", "c"]);
    assert_eq!(config.custom_parser, Duration::from_secs(60));
    assert_eq!(
        config.map,
        HashMap::from([
            ("a".to_string(), "b".to_string()),
            ("c".to_string(), "d".to_string())
        ])
    );
    assert_eq!(config.ptr, Some(123));
}

#[test]
fn test_load_is_idempotent() {
    let registry = duration_registry();
    let environ = scenario_environ();
    let binder = Binder::new(&registry, &environ);

    let mut first = Scenario::default();
    binder.load(&mut first).unwrap();
    let mut second = Scenario::default();
    binder.load(&mut second).unwrap();

    assert_eq!(first, second);

    // Loading again over an already bound target changes nothing either.
    binder.load(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_registered_default_applies() {
    let registry = duration_registry();
    let environ = environ(&[("REQ", "imhere")]);
    let mut config = Scenario::default();

    Binder::new(&registry, environ).load(&mut config).unwrap();

    assert_eq!(config.custom_parser, Duration::from_secs(12345));
    assert!(!config.embedded.embedded);
    assert!(config.some_slice.is_empty());
}

#[test]
fn test_required_missing_reports_key() {
    let registry = duration_registry();
    let mut config = Scenario::default();

    let err = Binder::new(&registry, MapEnviron::new())
        .load(&mut config)
        .unwrap_err();

    assert!(matches!(err, ConfigError::RequiredMissingError { .. }));
    assert_eq!(err.key(), Some("REQ"));
    assert!(err.to_string().contains("REQ"));
}

#[test]
fn test_pointer_left_empty_without_value() {
    let registry = duration_registry();
    let mut config = Scenario::default();

    Binder::new(&registry, environ(&[("REQ", "x")]))
        .load(&mut config)
        .unwrap();

    assert_eq!(config.ptr, None);
}

#[test]
fn test_pointer_not_set_when_conversion_fails() {
    let registry = duration_registry();
    let mut config = Scenario::default();

    let err = Binder::new(&registry, environ(&[("REQ", "x"), ("PTR", "abc")]))
        .load(&mut config)
        .unwrap_err();

    assert!(matches!(err, ConfigError::ConversionError { .. }));
    assert!(err.to_string().contains("PTR"));
    assert_eq!(config.ptr, None);
}

#[test]
fn test_unregistered_duration_is_skipped() {
    let registry = Registry::new();
    let mut config = Scenario::default();

    Binder::new(&registry, scenario_environ())
        .load(&mut config)
        .unwrap();

    assert_eq!(config.custom_parser, Duration::ZERO);
    assert_eq!(config.required, "imhere");
}

#[cfg(feature = "duration")]
#[test]
fn test_bundled_duration_setter() {
    let registry = Registry::with_defaults();
    let mut config = Scenario::default();

    Binder::new(&registry, scenario_environ())
        .load(&mut config)
        .unwrap();

    assert_eq!(config.custom_parser, Duration::from_secs(60));
}

#[derive(Debug, Default)]
struct Binary {
    hex: Vec<u8>,
    base64: Vec<u8>,
    numbers: Vec<i64>,
}

configurable!(Binary {
    hex,
    base64 => "base64,encoding=base64",
    numbers,
});

#[test]
fn test_byte_encodings() {
    let registry = Registry::new();
    let environ = environ(&[
        ("HEX", "0102030405060708090A0B0C0D0E0F"),
        ("BASE64", "AQIDBAUGBwgJCgsMDQ4P"),
        ("NUMBERS", "[1,0x10,-3]"),
    ]);
    let mut binary = Binary::default();

    Binder::new(&registry, environ).load(&mut binary).unwrap();

    let expected: Vec<u8> = (1..=15).collect();
    assert_eq!(binary.hex, expected);
    assert_eq!(binary.base64, expected);
    assert_eq!(binary.numbers, vec![1, 16, -3]);
}

#[test]
fn test_invalid_hex_is_conversion_error() {
    let registry = Registry::new();
    let mut binary = Binary::default();

    let err = Binder::new(&registry, environ(&[("HEX", "0g")]))
        .load(&mut binary)
        .unwrap_err();

    match err {
        ConfigError::ConversionError { key, value, .. } => {
            assert_eq!(key, "HEX");
            assert_eq!(value, "0g");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug)]
struct Server {
    host: IpAddr,
    listen: SocketAddr,
    root: PathBuf,
    labels: BTreeMap<String, String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 80),
            root: PathBuf::new(),
            labels: BTreeMap::new(),
        }
    }
}

configurable!(Server {
    host,
    listen,
    root => "root,default=/srv",
    labels,
});

#[derive(Debug, Default)]
struct AppConfig {
    server: Server,
    http_server_url: String,
    debug: bool,
}

configurable!(AppConfig {
    server => "server",
    http_server_url => "HTTPServerURL",
    debug,
});

#[test]
fn test_prefix_and_nested_names() {
    let registry = Registry::new();
    let environ = environ(&[
        ("MY_APP_SERVER_HOST", "10.0.0.1"),
        ("MY_APP_SERVER_LISTEN", "127.0.0.1:8080"),
        ("MY_APP_SERVER_LABELS", "tier=web,zone=a"),
        ("MY_APP_HTTP_SERVER_URL", "http://localhost"),
        ("MY_APP_DEBUG", "TRUE"),
    ]);
    let mut config = AppConfig::default();

    Binder::new(&registry, environ)
        .prefix("myApp")
        .load(&mut config)
        .unwrap();

    assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(config.server.listen.port(), 8080);
    assert_eq!(config.server.root, PathBuf::from("/srv"));
    assert_eq!(config.server.labels.get("zone").map(String::as_str), Some("a"));
    assert_eq!(config.http_server_url, "http://localhost");
    assert!(config.debug);
}

#[test]
fn test_text_decoding_error() {
    let registry = Registry::new();
    let mut config = AppConfig::default();

    let err = Binder::new(&registry, environ(&[("SERVER_HOST", "not-an-ip")]))
        .load(&mut config)
        .unwrap_err();

    match err {
        ConfigError::ConversionError {
            key, target_type, ..
        } => {
            assert_eq!(key, "SERVER_HOST");
            assert_eq!(target_type, "IpAddr");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Debug, Default, PartialEq)]
enum Level {
    #[default]
    Info,
    Debug,
}

impl std::str::FromStr for Level {
    type Err = std::io::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            _ => Err(std::io::Error::other(format!("unknown level {s}"))),
        }
    }
}

impl_text_value!(Level);

#[derive(Debug, Default)]
struct Logging {
    level: Level,
    fallback: Level,
}

configurable!(Logging {
    level,
    fallback => "fallback,default=debug",
});

#[test]
fn test_custom_text_capability() {
    let registry = Registry::new();
    let mut logging = Logging::default();

    Binder::new(&registry, environ(&[("LEVEL", "DEBUG")]))
        .load(&mut logging)
        .unwrap();

    assert_eq!(logging.level, Level::Debug);
    assert_eq!(logging.fallback, Level::Debug);
}

#[test]
fn test_registered_setter_overrides_capability() {
    let mut registry = Registry::new();
    registry.register::<Level, _>(|slot, raw| {
        *slot = if raw == "loud" { Level::Debug } else { Level::Info };
        Ok(())
    });
    let mut logging = Logging::default();

    Binder::new(&registry, environ(&[("LEVEL", "loud"), ("FALLBACK", "debug")]))
        .load(&mut logging)
        .unwrap();

    assert_eq!(logging.level, Level::Debug);
    assert_eq!(logging.fallback, Level::Info);
}

#[cfg(feature = "json")]
mod json {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Limits {
        burst: u32,
        rate: f64,
    }

    impl_json_value!(Limits);

    #[derive(Debug, Default)]
    struct Api {
        limits: Limits,
        json_data: Option<Limits>,
    }

    configurable!(Api {
        limits,
        json_data => "JSONData",
    });

    #[test]
    fn test_json_capability() {
        let registry = Registry::new();
        let environ = environ(&[
            ("LIMITS", r#"{"burst": 10, "rate": 2.5}"#),
            ("JSON_DATA", r#"{"burst": 1, "rate": 0.5}"#),
        ]);
        let mut api = Api::default();

        Binder::new(&registry, environ).load(&mut api).unwrap();

        assert_eq!(api.limits, Limits { burst: 10, rate: 2.5 });
        assert_eq!(api.json_data, Some(Limits { burst: 1, rate: 0.5 }));
    }

    #[test]
    fn test_invalid_json_is_conversion_error() {
        let registry = Registry::new();
        let mut api = Api::default();

        let err = Binder::new(&registry, environ(&[("LIMITS", "{")]))
            .load(&mut api)
            .unwrap_err();

        assert!(matches!(err, ConfigError::ConversionError { .. }));
        assert_eq!(err.key(), Some("LIMITS"));
    }
}

#[derive(Debug, Default)]
struct Strict {
    name: String,
    weights: HashMap<String, f64>,
}

configurable!(Strict { name, weights });

#[test]
fn test_strict_kinds() {
    let registry = Registry::new();
    let environ = environ(&[("NAME", "n"), ("WEIGHTS", "a=1.5")]);

    let mut lenient = Strict::default();
    Binder::new(&registry, &environ)
        .load(&mut lenient)
        .unwrap();
    assert_eq!(lenient.name, "n");
    assert!(lenient.weights.is_empty());

    let mut strict = Strict::default();
    let err = Binder::new(&registry, &environ)
        .strict_kinds(true)
        .load(&mut strict)
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedKindError { .. }));
    assert_eq!(err.key(), Some("WEIGHTS"));
}

#[derive(Debug, Default)]
struct Tagged {
    ok: String,
    broken: u32,
}

configurable!(Tagged {
    ok,
    broken => "broken,encoding=hex",
});

#[test]
fn test_tag_error_before_mutation() {
    let registry = Registry::new();
    let mut tagged = Tagged::default();

    let err = Binder::new(&registry, environ(&[("OK", "yes"), ("BROKEN", "1")]))
        .load(&mut tagged)
        .unwrap_err();

    match &err {
        ConfigError::TagSyntaxError { key, tag, .. } => {
            assert_eq!(key, "BROKEN");
            assert_eq!(tag, "broken,encoding=hex");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(tagged.ok, "");
}

#[test]
fn test_seconds_registry_helper() {
    let registry = seconds_registry();
    let mut config = Scenario::default();

    Binder::new(&registry, environ(&[("REQ", "r"), ("CUSTOM", "90")]))
        .load(&mut config)
        .unwrap();

    assert_eq!(config.custom_parser, Duration::from_secs(90));
}

#[derive(Debug, Default)]
struct RenamedBlob {
    payload_data: Vec<u8>,
}

configurable!(RenamedBlob {
    payload_data => "blob,encoding=rot13",
});

#[derive(Debug, Default)]
struct RenamedPort {
    port_number: u16,
}

configurable!(RenamedPort {
    port_number => "port,encoding=hex",
});

#[test]
fn test_tag_error_names_derived_key() {
    let registry = Registry::new();

    let mut blob = RenamedBlob::default();
    let err = Binder::new(&registry, environ(&[]))
        .prefix("app")
        .load(&mut blob)
        .unwrap_err();
    assert!(matches!(err, ConfigError::TagSyntaxError { .. }));
    assert_eq!(err.key(), Some("APP_BLOB"));

    let mut port = RenamedPort::default();
    let err = Binder::new(&registry, environ(&[("PORT", "80")]))
        .load(&mut port)
        .unwrap_err();
    assert_eq!(err.key(), Some("PORT"));
    assert_eq!(port.port_number, 0);
}

#[derive(Debug, Default, PartialEq)]
struct Replica {
    host: String,
    port: u16,
}

configurable!(Replica {
    host => "host,required",
    port => "port,default=5432",
});

#[derive(Debug, Default)]
struct Cluster {
    replica: Option<Replica>,
    name: String,
}

configurable!(Cluster { replica, name });

#[test]
fn test_set_optional_struct_is_bound_in_place() {
    let registry = Registry::new();
    let mut cluster = Cluster {
        replica: Some(Replica::default()),
        ..Cluster::default()
    };

    Binder::new(&registry, environ(&[("REPLICA_HOST", "db2")]))
        .load(&mut cluster)
        .unwrap();

    assert_eq!(
        cluster.replica,
        Some(Replica {
            host: "db2".to_string(),
            port: 5432,
        })
    );
}

#[test]
fn test_unset_optional_struct_allocated_by_value() {
    let registry = Registry::new();
    let mut cluster = Cluster::default();

    Binder::new(
        &registry,
        environ(&[("REPLICA_HOST", "db2"), ("REPLICA_PORT", "6432")]),
    )
    .load(&mut cluster)
    .unwrap();

    assert_eq!(
        cluster.replica,
        Some(Replica {
            host: "db2".to_string(),
            port: 6432,
        })
    );
}

#[test]
fn test_unset_optional_struct_without_values() {
    let registry = Registry::new();
    let mut cluster = Cluster::default();

    Binder::new(&registry, environ(&[("NAME", "main")]))
        .load(&mut cluster)
        .unwrap();

    assert_eq!(cluster.replica, None);
    assert_eq!(cluster.name, "main");
}

#[test]
fn test_set_optional_struct_enforces_required() {
    let registry = Registry::new();
    let mut cluster = Cluster {
        replica: Some(Replica::default()),
        ..Cluster::default()
    };

    let err = Binder::new(&registry, environ(&[]))
        .load(&mut cluster)
        .unwrap_err();
    assert_eq!(err.key(), Some("REPLICA_HOST"));
}
