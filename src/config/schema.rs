//! Configuration schema definitions for stagecraft.
//!
//! This module contains the struct definitions that map to
//! `.stagecraft/config.yml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::ExportFormat;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagecraftConfig {
    /// Choices offered on the channel step
    pub channels: Vec<String>,

    /// Choices offered on the platforms step
    pub platforms: Vec<String>,

    /// Choices offered on the action step
    pub actions: Vec<String>,

    /// Where generated content comes from
    pub gateway: GatewayConfig,

    /// Export defaults
    pub export: ExportConfig,

    /// Saved package storage
    pub library: LibraryConfig,
}

impl Default for StagecraftConfig {
    fn default() -> Self {
        Self {
            channels: strings(&["social", "email", "blog"]),
            platforms: strings(&["twitter", "linkedin", "instagram", "facebook"]),
            actions: strings(&["announce", "promote", "educate"]),
            gateway: GatewayConfig::default(),
            export: ExportConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Generator backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    /// Templated offline output
    #[default]
    Mock,
    /// Remote endpoint
    Http,
}

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub kind: GatewayKind,

    /// URL to POST generation requests to (required for `http`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Environment variable holding a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::Mock,
            endpoint: None,
            timeout_secs: 30,
            api_key_env: None,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default document format
    pub format: ExportFormatName,

    /// Directory exports are written to (relative to project root)
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormatName::Markdown,
            directory: PathBuf::from("exports"),
        }
    }
}

/// Export format as written in YAML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormatName {
    #[default]
    Markdown,
    Plaintext,
    Json,
}

impl From<ExportFormatName> for ExportFormat {
    fn from(name: ExportFormatName) -> Self {
        match name {
            ExportFormatName::Markdown => ExportFormat::Markdown,
            ExportFormatName::Plaintext => ExportFormat::Plaintext,
            ExportFormatName::Json => ExportFormat::Json,
        }
    }
}

/// Library settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding saved packages (relative to project root)
    pub path: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".stagecraft").join("library"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: StagecraftConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, StagecraftConfig::default());
        assert_eq!(config.channels, vec!["social", "email", "blog"]);
        assert_eq!(config.gateway.kind, GatewayKind::Mock);
        assert_eq!(config.gateway.timeout_secs, 30);
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
channels: [social]
platforms: [mastodon, bluesky]
actions: [launch]
gateway:
  kind: http
  endpoint: https://gen.example.com/v1
  timeout_secs: 10
  api_key_env: GEN_KEY
export:
  format: json
  directory: out
library:
  path: saved
"#;
        let config: StagecraftConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.platforms, vec!["mastodon", "bluesky"]);
        assert_eq!(config.gateway.kind, GatewayKind::Http);
        assert_eq!(
            config.gateway.endpoint.as_deref(),
            Some("https://gen.example.com/v1")
        );
        assert_eq!(config.gateway.api_key_env.as_deref(), Some("GEN_KEY"));
        assert_eq!(ExportFormat::from(config.export.format), ExportFormat::Json);
        assert_eq!(config.library.path, PathBuf::from("saved"));
    }

    #[test]
    fn partial_gateway_keeps_defaults() {
        let config: StagecraftConfig =
            serde_yaml::from_str("gateway:\n  endpoint: http://x\n").unwrap();
        assert_eq!(config.gateway.kind, GatewayKind::Mock);
        assert_eq!(config.gateway.timeout_secs, 30);
    }

    #[test]
    fn unknown_gateway_kind_is_rejected() {
        let result: Result<StagecraftConfig, _> = serde_yaml::from_str("gateway:\n  kind: grpc\n");
        assert!(result.is_err());
    }
}
