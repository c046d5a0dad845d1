//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::merger::merge_configs;
use crate::config::schema::StagecraftConfig;
use crate::error::{Result, StagecraftError};

/// Directory holding project configuration and the default library.
pub const CONFIG_DIR: &str = ".stagecraft";

/// Configuration files for a project, in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// `.stagecraft/config.yml`
    pub project: Option<PathBuf>,

    /// `.stagecraft/config.local.yml`
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        let dir = project_root.join(CONFIG_DIR);
        Self {
            project: existing(dir.join("config.yml")),
            project_local: existing(dir.join("config.local.yml")),
        }
    }

    /// Existing paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Walk up from `start` looking for a `.stagecraft` directory, then `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_DIR).is_dir() || current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StagecraftError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StagecraftError::Io(e)
        }
    })
}

/// Parse YAML content into a config; `source_path` is for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<StagecraftConfig> {
    if content.trim().is_empty() {
        return Ok(StagecraftConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| StagecraftError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single config file.
pub fn load_config_file(path: &Path) -> Result<StagecraftConfig> {
    let content = read(path)?;
    parse_config(&content, path)
}

/// Load a config file as a raw YAML value for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| StagecraftError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge `config.yml` and `config.local.yml`; defaults when neither exists.
pub fn load_merged_config(project_root: &Path) -> Result<StagecraftConfig> {
    let paths = ConfigPaths::discover(project_root);
    let existing = paths.all_existing();
    if existing.is_empty() {
        debug!(root = %project_root.display(), "No configuration found, using defaults");
        return Ok(StagecraftConfig::default());
    }

    let layers = existing
        .into_iter()
        .map(|path| load_config_value(path))
        .collect::<Result<Vec<_>>>()?;

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| StagecraftError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config, using `config_override` alone when given.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<StagecraftConfig> {
    match config_override {
        Some(path) => load_config_file(path),
        None => load_merged_config(project_root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::GatewayKind;
    use tempfile::TempDir;

    fn project(config: Option<&str>, local: Option<&str>) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = config {
            fs::write(dir.join("config.yml"), content).unwrap();
        }
        if let Some(content) = local {
            fs::write(dir.join("config.local.yml"), content).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_both_files() {
        let temp = project(Some(""), Some(""));
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
    }

    #[test]
    fn missing_config_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, StagecraftConfig::default());
    }

    #[test]
    fn local_overrides_project() {
        let temp = project(
            Some("channels: [social, email]\ngateway:\n  kind: http\n  endpoint: https://prod\n"),
            Some("gateway:\n  endpoint: http://localhost:9000\n"),
        );

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.channels, vec!["social", "email"]);
        assert_eq!(config.gateway.kind, GatewayKind::Http);
        assert_eq!(
            config.gateway.endpoint.as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn local_alone_is_applied() {
        let temp = project(None, Some("actions: [launch]\n"));
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.actions, vec!["launch"]);
    }

    #[test]
    fn empty_file_is_defaults() {
        let temp = project(Some(""), None);
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, StagecraftConfig::default());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let result = parse_config("channels: [", Path::new("bad.yml"));
        assert!(matches!(result, Err(StagecraftError::ConfigParseError { .. })));
    }

    #[test]
    fn override_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), Some(&temp.path().join("missing.yml")));
        assert!(matches!(result, Err(StagecraftError::ConfigNotFound { .. })));
    }

    #[test]
    fn override_skips_project_files() {
        let temp = project(Some("actions: [from-project]\n"), None);
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "actions: [from-override]\n").unwrap();

        let config = load_config(temp.path(), Some(&custom)).unwrap();
        assert_eq!(config.actions, vec!["from-override"]);
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = project(None, None);
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
    }
}
