//! Configuration validation rules.
//!
//! - Choice lists must be non-empty and free of blanks and duplicates
//! - The `http` gateway needs an endpoint
//! - The gateway timeout must be positive

use std::collections::HashSet;

use crate::config::schema::{GatewayKind, StagecraftConfig};
use crate::error::{Result, StagecraftError};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &StagecraftConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_choices("channels", &config.channels));
    errors.extend(validate_choices("platforms", &config.platforms));
    errors.extend(validate_choices("actions", &config.actions));
    errors.extend(validate_gateway(config));

    errors
}

fn validate_choices(field: &str, values: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if values.is_empty() {
        errors.push(ValidationError::new(
            "empty-choices",
            format!("'{}' must list at least one choice", field),
        ));
    }

    let mut seen = HashSet::new();
    for value in values {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(
                "blank-choice",
                format!("'{}' contains a blank entry", field),
            ));
        } else if !seen.insert(value.as_str()) {
            errors.push(ValidationError::new(
                "duplicate-choice",
                format!("'{}' lists '{}' more than once", field, value),
            ));
        }
    }

    errors
}

fn validate_gateway(config: &StagecraftConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let gateway = &config.gateway;

    if gateway.kind == GatewayKind::Http
        && gateway.endpoint.as_deref().is_none_or(|e| e.trim().is_empty())
    {
        errors.push(ValidationError::new(
            "missing-endpoint",
            "gateway kind 'http' requires 'endpoint'",
        ));
    }

    if gateway.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "zero-timeout",
            "gateway 'timeout_secs' must be greater than zero",
        ));
    }

    errors
}

/// Validate and return the first error as a [`StagecraftError`].
pub fn validate(config: &StagecraftConfig) -> Result<()> {
    let errors = validate_config(config);
    if let Some(first) = errors.into_iter().next() {
        return Err(StagecraftError::ConfigValidationError {
            message: first.message,
        });
    }
    Ok(())
}
