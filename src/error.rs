//! Error types for stagecraft operations.
//!
//! This module defines [`StagecraftError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Pipeline and store validation failures get their own variants so callers
//!   can match on them; every one leaves the session in a resumable state
//! - Collaborator implementations (HTTP gateway, file library) use
//!   `anyhow::Error` internally and surface through `StagecraftError::Other`
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

use crate::assets::VersionId;
use crate::pipeline::PipelineStep;

/// Core error type for stagecraft operations.
#[derive(Debug, Error)]
pub enum StagecraftError {
    /// Attempted to commit empty or whitespace-only content.
    #[error("Refusing to commit blank content to '{step}'")]
    InvalidContent { step: PipelineStep },

    /// Restore referenced a version the asset does not hold.
    #[error("Version {version} not found in '{step}' history")]
    VersionNotFound {
        step: PipelineStep,
        version: VersionId,
    },

    /// The generation gateway returned an error.
    #[error("Generation failed for '{step}': {message}")]
    GenerationFailed { step: PipelineStep, message: String },

    /// Navigation or action not permitted from the current state.
    #[error("Cannot leave '{from}': {message}")]
    InvalidTransition { from: PipelineStep, message: String },

    /// Regeneration would discard downstream content without confirmation.
    #[error("Regenerating '{step}' discards {affected}; confirmation required")]
    ConfirmationRequired { step: PipelineStep, affected: String },

    /// An asset operation targeted a step that owns no asset.
    #[error("Step '{step}' has no asset")]
    NotAnAssetStep { step: PipelineStep },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Export format name not recognised.
    #[error("Unknown export format: {name}")]
    UnknownFormat { name: String },

    /// No saved package with this id.
    #[error("Library entry not found: {id}")]
    LibraryEntryNotFound { id: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for stagecraft operations.
pub type Result<T> = std::result::Result<T, StagecraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_content_displays_step() {
        let err = StagecraftError::InvalidContent {
            step: PipelineStep::Brief,
        };
        assert!(err.to_string().contains("brief"));
    }

    #[test]
    fn version_not_found_displays_step_and_version() {
        let err = StagecraftError::VersionNotFound {
            step: PipelineStep::Generate,
            version: VersionId::new(42),
        };
        let msg = err.to_string();
        assert!(msg.contains("generate"));
        assert!(msg.contains("v42"));
    }

    #[test]
    fn generation_failed_displays_message() {
        let err = StagecraftError::GenerationFailed {
            step: PipelineStep::PlatformCopy,
            message: "upstream timeout".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("platform-copy"));
        assert!(msg.contains("upstream timeout"));
    }

    #[test]
    fn invalid_transition_displays_reason() {
        let err = StagecraftError::InvalidTransition {
            from: PipelineStep::Generate,
            message: "asset is empty".into(),
        };
        assert!(err.to_string().contains("asset is empty"));
    }

    #[test]
    fn confirmation_required_lists_affected() {
        let err = StagecraftError::ConfirmationRequired {
            step: PipelineStep::Generate,
            affected: "brief, platform-copy".into(),
        };
        assert!(err.to_string().contains("brief, platform-copy"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = StagecraftError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: StagecraftError = io_err.into();
        assert!(matches!(err, StagecraftError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(StagecraftError::UnknownFormat {
                name: "docx".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
