//! Sightengine-backed analysis provider.
//!
//! Speaks the `check.json` wire format: one multipart POST carrying the
//! image bytes, the comma-separated model list, and the key pair. The
//! response is a flat JSON document with per-model scores; a `status` of
//! `"failure"` signals a provider-side rejection even on HTTP 200.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::ProviderConfig;
use crate::domain::AnalysisReport;
use crate::provider::{AnalysisProvider, ProviderError, ProviderReport};

/// Analysis provider client for the Sightengine moderation API.
pub struct SightengineClient {
    config: ProviderConfig,
    client: Client,
}

impl SightengineClient {
    /// Create a new client from the injected configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Interpret a raw provider response body.
    ///
    /// Split out from the request path so the decoding rules are testable
    /// without a network.
    fn parse_response(raw: serde_json::Value) -> Result<ProviderReport, ProviderError> {
        if raw.get("status").and_then(|s| s.as_str()) == Some("failure") {
            let message = raw
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .unwrap_or("unspecified provider failure")
                .to_string();
            return Err(ProviderError::Rejected(message));
        }

        let report = AnalysisReport::from_value(&raw)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(ProviderReport { raw, report })
    }
}

#[async_trait]
impl AnalysisProvider for SightengineClient {
    async fn analyze(&self, image: &[u8]) -> Result<ProviderReport, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::MissingCredentials);
        }

        let form = Form::new()
            .text("models", self.config.models.join(","))
            .text("api_user", self.config.api_user.clone())
            .text("api_secret", self.config.api_secret.clone())
            .part("media", Part::bytes(image.to_vec()).file_name("upload"));

        tracing::debug!(
            endpoint = %self.config.endpoint,
            models = %self.config.models.join(","),
            image_len = image.len(),
            "Submitting image for analysis"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        Self::parse_response(raw)
    }

    fn is_configured(&self) -> bool {
        !self.config.api_user.is_empty() && !self.config.api_secret.is_empty()
    }
}
