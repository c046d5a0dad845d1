//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use stagecraft::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".stagecraft");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "channels: [social]").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.channels, vec!["social".to_string()]);
//! ```
//!
//! # Configuration File Locations
//!
//! 1. Project config (`.stagecraft/config.yml`)
//! 2. Local overrides (`.stagecraft/config.local.yml`)
//!
//! `--config <path>` loads a single file instead. With no files at all the
//! defaults apply.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    ExportConfig, ExportFormatName, GatewayConfig, GatewayKind, LibraryConfig, StagecraftConfig,
};
pub use validator::{validate, validate_config, ValidationError};
