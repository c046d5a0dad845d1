//! The text generator the pipeline calls out to.
//!
//! The pipeline treats generation as an opaque function from a step and its
//! context to text. Two implementations ship with the crate:
//!
//! - [`MockGateway`] - deterministic templated output, for offline use and tests
//! - [`HttpGateway`] - POSTs the request to a remote endpoint
//!
//! Any `Fn(&GenerationRequest) -> anyhow::Result<Generated>` closure is also a
//! gateway, which keeps test doubles short.

mod http;
mod mock;

pub use http::HttpGateway;
pub use mock::MockGateway;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::config::{GatewayConfig, GatewayKind};
use crate::error::{Result, StagecraftError};
use crate::pipeline::{PipelineStep, Selection};

/// Everything a generator gets to see for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub step: PipelineStep,
    pub selection: Selection,
    /// Live content of every upstream asset the step is derived from.
    pub upstream: BTreeMap<PipelineStep, String>,
    /// 1 for the first generation of the asset, incremented per regeneration.
    pub revision: u32,
}

impl GenerationRequest {
    /// Live content of one upstream step.
    pub fn upstream_content(&self, step: PipelineStep) -> Option<&str> {
        self.upstream.get(&step).map(String::as_str)
    }
}

/// A generator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

impl Generated {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tokens_used: None,
        }
    }
}

/// Produces content for an asset step.
pub trait GenerationGateway {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<Generated>;
}

impl<F> GenerationGateway for F
where
    F: Fn(&GenerationRequest) -> anyhow::Result<Generated>,
{
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<Generated> {
        self(request)
    }
}

/// Build the gateway described by configuration.
///
/// For `http`, a configured `api_key_env` that is unset is not an error; the
/// request simply goes out without a token.
pub fn from_config(config: &GatewayConfig) -> Result<Box<dyn GenerationGateway>> {
    match config.kind {
        GatewayKind::Mock => Ok(Box::new(MockGateway::new())),
        GatewayKind::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                StagecraftError::ConfigValidationError {
                    message: "gateway kind 'http' requires 'endpoint'".to_string(),
                }
            })?;
            let mut gateway =
                HttpGateway::with_timeout(endpoint, Duration::from_secs(config.timeout_secs))?;
            if let Some(var) = &config.api_key_env {
                match std::env::var(var) {
                    Ok(key) => gateway = gateway.with_api_key(key),
                    Err(_) => debug!(var = %var, "API key variable not set"),
                }
            }
            Ok(Box::new(gateway))
        }
    }
}
