//! Analysis Provider boundary.
//!
//! The provider inspects image bytes and returns per-model probability
//! scores plus extracted text and faces. Everything network-related lives
//! behind the [`AnalysisProvider`] trait so the evaluation path and its
//! tests never touch the wire.

mod sightengine;

pub use sightengine::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AnalysisReport;

/// Failures at the provider boundary.
///
/// None of these are retried here; the caller surfaces them as the `Error`
/// verdict.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Analysis request failed: {0}")]
    Request(String),

    #[error("Analysis API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Analysis provider rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to decode analysis response: {0}")]
    Decode(String),

    #[error("Analysis provider credentials are not configured")]
    MissingCredentials,
}

/// A successful provider response: the raw JSON for pass-through display and
/// the typed view the evaluator consumes.
#[derive(Debug, Clone)]
pub struct ProviderReport {
    /// The provider response, verbatim.
    pub raw: serde_json::Value,
    /// Typed view with defaults for absent fields.
    pub report: AnalysisReport,
}

/// Trait for analysis provider implementations.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Run the full multi-model analysis on one image.
    async fn analyze(&self, image: &[u8]) -> Result<ProviderReport, ProviderError>;

    /// Whether the provider has credentials to make live calls.
    fn is_configured(&self) -> bool;
}
