//! Integration tests for config module public API.

use stagecraft::config::{
    load_config, load_merged_config, validate, validate_config, GatewayKind, StagecraftConfig,
};
use stagecraft::export::ExportFormat;
use stagecraft::gateway;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(config: &str, local: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".stagecraft");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    if let Some(local) = local {
        fs::write(dir.join("config.local.yml"), local).unwrap();
    }
    temp
}

#[test]
fn missing_config_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = load_merged_config(temp.path()).unwrap();
    assert_eq!(config, StagecraftConfig::default());
    validate(&config).unwrap();
}

#[test]
fn local_overrides_project_settings() {
    let temp = project(
        r#"
channels: [social, email]
gateway:
  kind: http
  endpoint: https://generator.example.com/v1
  timeout_secs: 10
export:
  format: plaintext
"#,
        Some(
            r#"
gateway:
  kind: mock
export:
  directory: out
"#,
        ),
    );

    let config = load_merged_config(temp.path()).unwrap();

    assert_eq!(config.channels, vec!["social", "email"]);
    assert_eq!(config.gateway.kind, GatewayKind::Mock);
    assert_eq!(config.gateway.timeout_secs, 10);
    assert_eq!(ExportFormat::from(config.export.format), ExportFormat::Plaintext);
    assert_eq!(config.export.directory, Path::new("out"));
    assert!(gateway::from_config(&config.gateway).is_ok());
}

#[test]
fn explicit_config_file_ignores_project_files() {
    let temp = project("actions: [educate]", None);
    let other = temp.path().join("other.yml");
    fs::write(&other, "actions: [promote]").unwrap();

    let config = load_config(temp.path(), Some(&other)).unwrap();
    assert_eq!(config.actions, vec!["promote"]);
}

#[test]
fn validation_reports_every_problem() {
    let temp = project(
        r#"
channels: []
platforms: [twitter, twitter]
gateway:
  kind: http
  timeout_secs: 0
"#,
        None,
    );

    let config = load_merged_config(temp.path()).unwrap();
    let rules: Vec<_> = validate_config(&config).into_iter().map(|e| e.rule).collect();

    assert!(rules.contains(&"empty-choices".to_string()));
    assert!(rules.contains(&"duplicate-choice".to_string()));
    assert!(rules.contains(&"missing-endpoint".to_string()));
    assert!(rules.contains(&"zero-timeout".to_string()));
    assert!(validate(&config).is_err());
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let temp = project("channels: [social\n", None);
    let err = load_merged_config(temp.path()).unwrap_err();
    assert!(err.to_string().contains("config.yml"));
}
