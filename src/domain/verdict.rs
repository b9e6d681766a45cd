//! Verdict and evaluation result domain types.
//!
//! Represents the moderation decision for one submitted image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed justification reported when no rule triggers.
pub const GUIDELINES_SATISFIED: &str = "The image satisfies the content guidelines.";

/// Tri-state outcome of a moderation evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No rule triggered; the image passes.
    Approved,
    /// At least one rule triggered; the image violates policy.
    Rejected,
    /// The Analysis Provider call failed; no evaluation took place.
    Error,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Approved => write!(f, "approved"),
            Verdict::Rejected => write!(f, "rejected"),
            Verdict::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" => Ok(Verdict::Approved),
            "rejected" => Ok(Verdict::Rejected),
            "error" => Ok(Verdict::Error),
            _ => Err(format!("Unknown verdict: {}", s)),
        }
    }
}

/// Diagnostic readout of the primary face's emotion scores.
///
/// Recorded whenever the report contains at least one face, for display in
/// the review console. Never part of the verdict derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FaceEmotionReadout {
    pub sorrow: f64,
    pub anger: f64,
}

/// Result of evaluating one image against a threshold set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluationResult {
    /// Unique identifier for this evaluation.
    pub id: Uuid,

    /// Final verdict.
    pub verdict: Verdict,

    /// Human-readable justifications, in fixed rule order.
    pub reasons: Vec<String>,

    /// Stable identifiers of the rules that triggered, same order as
    /// `reasons`.
    pub rule_hits: Vec<String>,

    /// Primary-face emotion diagnostic, when a face was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_emotion: Option<FaceEmotionReadout>,

    /// When this evaluation was created.
    pub created_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Create a new EvaluationResult.
    pub fn new(verdict: Verdict, reasons: Vec<String>, rule_hits: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            verdict,
            reasons,
            rule_hits,
            face_emotion: None,
            created_at: Utc::now(),
        }
    }

    /// Create an Approved result with the fixed default justification.
    pub fn approved() -> Self {
        Self::new(
            Verdict::Approved,
            vec![GUIDELINES_SATISFIED.to_string()],
            Vec::new(),
        )
    }

    /// Create a Rejected result from the triggered rules.
    pub fn rejected(reasons: Vec<String>, rule_hits: Vec<String>) -> Self {
        Self::new(Verdict::Rejected, reasons, rule_hits)
    }

    /// Create an Error result describing a provider failure.
    pub fn provider_error(description: impl Into<String>) -> Self {
        Self::new(Verdict::Error, vec![description.into()], Vec::new())
    }

    /// Attach the face-emotion diagnostic readout.
    pub fn with_face_emotion(mut self, readout: Option<FaceEmotionReadout>) -> Self {
        self.face_emotion = readout;
        self
    }
}

/// An evaluation together with the pass-through provider report.
///
/// This is the unit the API returns and the memoization cache stores: the
/// caller can always render full analysis detail regardless of verdict.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerationOutcome {
    /// The evaluation result.
    pub evaluation: EvaluationResult,
    /// The raw provider report, unchanged. Empty object on provider failure.
    #[schema(value_type = Object)]
    pub report: serde_json::Value,
}

impl ModerationOutcome {
    /// Outcome for a failed provider call: `Error` verdict, the failure
    /// description as the sole reason, and an empty report.
    pub fn provider_error(description: impl Into<String>) -> Self {
        Self {
            evaluation: EvaluationResult::provider_error(description),
            report: serde_json::json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }

    #[test]
    fn test_verdict_from_str() {
        assert_eq!("approved".parse::<Verdict>().unwrap(), Verdict::Approved);
        assert_eq!("ERROR".parse::<Verdict>().unwrap(), Verdict::Error);
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_approved_carries_fixed_reason() {
        let result = EvaluationResult::approved();
        assert_eq!(result.verdict, Verdict::Approved);
        assert_eq!(result.reasons, vec![GUIDELINES_SATISFIED.to_string()]);
        assert!(result.rule_hits.is_empty());
    }

    #[test]
    fn test_provider_error_outcome_has_empty_report() {
        let outcome = ModerationOutcome::provider_error("connection refused");
        assert_eq!(outcome.evaluation.verdict, Verdict::Error);
        assert_eq!(outcome.evaluation.reasons.len(), 1);
        assert_eq!(outcome.report, serde_json::json!({}));
    }
}
