//! Remote generation over HTTP.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use super::{Generated, GenerationGateway, GenerationRequest};

/// POSTs each [`GenerationRequest`] as JSON and reads back a [`Generated`].
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway with the default 30-second timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(30))
    }

    /// Create a gateway with a custom timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("stagecraft/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            timeout,
        })
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl GenerationGateway for HttpGateway {
    fn generate(&self, request: &GenerationRequest) -> Result<Generated> {
        debug!(step = %request.step, endpoint = %self.endpoint, "Requesting generation");

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        if !response.status().is_success() {
            bail!("HTTP {} from {}", response.status(), self.endpoint);
        }

        response
            .json::<Generated>()
            .context("Generation response was not valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStep, Selection};
    use httpmock::prelude::*;
    use std::collections::BTreeMap;

    fn request() -> GenerationRequest {
        GenerationRequest {
            step: PipelineStep::Generate,
            selection: Selection {
                channel: Some("email".into()),
                platforms: vec!["newsletter".into()],
                action: Some("announce".into()),
            },
            upstream: BTreeMap::new(),
            revision: 1,
        }
    }

    #[test]
    fn default_timeout_is_30_seconds() {
        let gateway = HttpGateway::new("http://localhost/generate").unwrap();
        assert_eq!(gateway.timeout(), Duration::from_secs(30));
        assert_eq!(gateway.endpoint(), "http://localhost/generate");
    }

    #[test]
    fn posts_request_and_reads_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"content":"Fresh copy","tokensUsed":7}"#);
        });

        let gateway = HttpGateway::new(server.url("/generate")).unwrap();
        let generated = gateway.generate(&request()).unwrap();

        mock.assert();
        assert_eq!(generated.content, "Fresh copy");
        assert_eq!(generated.tokens_used, Some(7));
    }

    #[test]
    fn sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/generate")
                .header("authorization", "Bearer secret");
            then.status(200).body(r#"{"content":"ok"}"#);
        });

        let gateway = HttpGateway::new(server.url("/generate"))
            .unwrap()
            .with_api_key("secret");
        gateway.generate(&request()).unwrap();

        mock.assert();
    }

    #[test]
    fn server_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(500).body("boom");
        });

        let gateway = HttpGateway::new(server.url("/generate")).unwrap();
        let err = gateway.generate(&request()).unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn malformed_body_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(200).body("not json");
        });

        let gateway = HttpGateway::new(server.url("/generate")).unwrap();
        assert!(gateway.generate(&request()).is_err());
    }
}
