//! Configuration tests
//!
//! Round-trip and precedence checks. When a field is added to `Config`, the
//! round-trip test fails until `to_toml()` and `FileConfig` both learn it.

use super::*;
use crate::proxy::translation::ContentNormalizer;
use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: FileConfig = toml::from_str(&toml_str)
        .unwrap_or_else(|e| panic!("Default config should parse.\nTOML:\n{}\nError: {}", toml_str, e));
    let loaded = Config::from_sources(parsed, no_env).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.bind_addr = "0.0.0.0:8181".parse().unwrap();
    config.backend_url = "http://localhost:11434/v1".to_string();
    config.timeout_secs = 90;
    config.stream_chunk_size = 4096;
    config.translation.content_policy = ContentNormalizer::StructuredToolCalls;
    config.translation.canonical_model = "vendor \"quoted\" model".to_string();
    config.translation.model_alias = "my-model".to_string();
    config.translation.default_max_tokens = 2048;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    let loaded = Config::from_sources(parsed, no_env).unwrap();

    assert_eq!(loaded, config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::from_sources(FileConfig::default(), no_env).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
        bind_addr = "127.0.0.1:7000"
        backend_url = "https://file.example/v1"
        timeout_secs = 10

        [translation]
        content_policy = "render-tool-use"
        "#,
    )
    .unwrap();

    let env = env_from(&[
        ("TOOLBRIDGE_BIND", "127.0.0.1:7100"),
        ("TOOLBRIDGE_BACKEND_URL", "https://env.example/v1/"),
        ("TOOLBRIDGE_TIMEOUT_SECS", "45"),
        ("TOOLBRIDGE_CONTENT_POLICY", "tool-calls"),
    ]);
    let config = Config::from_sources(file, env).unwrap();

    assert_eq!(config.bind_addr.port(), 7100);
    assert_eq!(config.backend_url, "https://env.example/v1");
    assert_eq!(config.timeout_secs, 45);
    assert_eq!(
        config.translation.content_policy,
        ContentNormalizer::StructuredToolCalls
    );
}

#[test]
fn test_file_values_used_without_env() {
    let file: FileConfig = toml::from_str(
        r#"
        backend_url = "https://file.example/v1//"

        [translation]
        content_policy = "render-tool-use"
        default_max_tokens = 0

        [logging]
        file_rotation = "never"
        "#,
    )
    .unwrap();

    let config = Config::from_sources(file, no_env).unwrap();

    assert_eq!(config.backend_url, "https://file.example/v1");
    assert_eq!(
        config.translation.content_policy,
        ContentNormalizer::TextCollapse {
            drop_tool_use: false
        }
    );
    // A zero default bound would defeat the validator
    assert_eq!(config.translation.default_max_tokens, 1024);
    assert_eq!(config.logging.file_rotation, LogRotation::Never);
}

#[test]
fn test_zero_timeout_falls_back() {
    let file: FileConfig = toml::from_str("timeout_secs = 0").unwrap();
    let config = Config::from_sources(file, no_env).unwrap();
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

    let env = env_from(&[("TOOLBRIDGE_TIMEOUT_SECS", "0")]);
    let config = Config::from_sources(FileConfig::default(), env).unwrap();
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn test_unknown_policy_falls_back() {
    let env = env_from(&[("TOOLBRIDGE_CONTENT_POLICY", "bogus")]);
    let config = Config::from_sources(FileConfig::default(), env).unwrap();
    assert_eq!(config.translation.content_policy, ContentNormalizer::default());
}

#[test]
fn test_invalid_values_are_errors() {
    let env = env_from(&[("TOOLBRIDGE_BIND", "not-an-addr")]);
    assert!(Config::from_sources(FileConfig::default(), env).is_err());

    let env = env_from(&[("TOOLBRIDGE_TIMEOUT_SECS", "soon")]);
    assert!(Config::from_sources(FileConfig::default(), env).is_err());
}

#[test]
fn test_malformed_file_is_rejected() {
    let parsed: Result<FileConfig, _> = toml::from_str("timeout_secs = \"thirty\"");
    assert!(parsed.is_err());
}
