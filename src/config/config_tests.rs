// Copyright 2024-2026 devstack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for configuration loading and overrides.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_are_valid() {
    let config = DevstackConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.kube_context(), "kind-devstack");
    assert_eq!(config.readiness.timeout_attempts, 60);
    assert_eq!(config.readiness.interval().as_secs(), 1);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "cluster_name = \"team-a\"\n\n[readiness]\ntimeout_attempts = 10"
    )
    .unwrap();

    let config = from_file(file.path()).unwrap();
    assert_eq!(config.cluster_name, "team-a");
    assert_eq!(config.network_name, "devstack-net");
    assert_eq!(config.readiness.timeout_attempts, 10);
    assert_eq!(config.readiness.port, 5432);
}

#[test]
fn test_unknown_key_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "clustr_name = \"typo\"").unwrap();

    let result = from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_explicit_missing_file() {
    let missing = PathBuf::from("/nonexistent/devstack.toml");
    let result = load(Some(&missing));
    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == missing));
}

#[test]
fn test_env_overrides() {
    let mut config = DevstackConfig::default();
    apply_env(
        &mut config,
        env(&[
            ("DEVSTACK_CLUSTER_NAME", "ci"),
            ("DEVSTACK_NETWORK_NAME", "ci-net"),
            ("DEVSTACK_INSTALL_DIR", "/opt/bin"),
            ("DEVSTACK_READINESS_TIMEOUT", "5"),
        ]),
    )
    .unwrap();

    assert_eq!(config.cluster_name, "ci");
    assert_eq!(config.network_name, "ci-net");
    assert_eq!(config.install_dir, PathBuf::from("/opt/bin"));
    assert_eq!(config.readiness.timeout_attempts, 5);
    assert_eq!(config.values_dir, PathBuf::from("deploy/values"));
}

#[test]
fn test_env_override_bad_number() {
    let mut config = DevstackConfig::default();
    let result = apply_env(&mut config, env(&[("DEVSTACK_READINESS_TIMEOUT", "soon")]));
    assert!(matches!(result, Err(ConfigError::Env { .. })));
}

#[test]
fn test_validate_rejects_zero_interval() {
    let mut config = DevstackConfig::default();
    config.readiness.interval_secs = 0;
    assert!(matches!(
        config.validate(),
        Err(ValidationError::OutOfRange { .. })
    ));
}

#[test]
fn test_validate_caps_timeout_attempts() {
    let mut config = DevstackConfig::default();
    apply_env(&mut config, env(&[("DEVSTACK_READINESS_TIMEOUT", "4294967295")])).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ValidationError::OutOfRange { field, .. }) if field == "readiness.timeout_attempts"
    ));

    config.readiness.timeout_attempts = types::MAX_TIMEOUT_ATTEMPTS;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_cluster_name() {
    let config = DevstackConfig {
        cluster_name: "My_Cluster".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ValidationError::InvalidName { .. })
    ));
}

#[test]
fn test_toml_render_parses_back() {
    let config = DevstackConfig {
        cluster_name: "render".to_string(),
        ..Default::default()
    };
    let text = to_toml(&config);
    assert!(text.contains("cluster_name = \"render\""));
    assert!(text.contains("[readiness]"));

    let parsed: DevstackConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_example_file_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("devstack.toml.example");
    let config = from_file(&path).unwrap();
    assert_eq!(config, DevstackConfig::default());
}
