//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EvaluationResult, Thresholds};

// ==================== Moderate Image ====================

/// Request to moderate one image.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ModerateImageRequest {
    /// Base64-encoded image bytes (JPEG/PNG).
    pub image: String,
    /// Threshold overrides. When absent, the configured calibration
    /// applies. When present, categories missing from the mapping default
    /// to 1.0 and never trigger.
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
}

/// Response from image moderation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModerateImageResponse {
    /// The evaluation result.
    pub evaluation: EvaluationResult,
    /// The raw analysis report, unchanged. Empty object when the verdict
    /// is `error`.
    #[schema(value_type = Object)]
    pub report: serde_json::Value,
    /// Whether this outcome was served from the evaluation cache.
    pub cached: bool,
}

// ==================== Evaluate Report ====================

/// Request to evaluate an already-materialized analysis report.
///
/// Calibration replay: lets an operator re-score a stored report against
/// adjusted thresholds without re-submitting the image.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EvaluateReportRequest {
    /// The analysis report, in provider wire shape.
    #[schema(value_type = Object)]
    pub report: serde_json::Value,
    /// Threshold overrides; same semantics as image moderation.
    #[serde(default)]
    pub thresholds: Option<Thresholds>,
}

/// Response from report evaluation.
#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluateReportResponse {
    /// The evaluation result.
    pub evaluation: EvaluationResult,
    /// The submitted report, passed through unchanged.
    #[schema(value_type = Object)]
    pub report: serde_json::Value,
}

// ==================== Thresholds ====================

/// Response carrying the configured default thresholds.
#[derive(Debug, Serialize, ToSchema)]
pub struct ThresholdsResponse {
    pub thresholds: Thresholds,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether the Analysis Provider has credentials configured.
    pub provider: String,
    /// Timestamp.
    pub timestamp: String,
}
