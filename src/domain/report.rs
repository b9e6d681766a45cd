//! Analysis report domain types.
//!
//! Typed view of the multi-model report returned by the Analysis Provider.
//! Every optional field carries a safe default: absence means a probability
//! of 0.0, an empty string, or an empty sequence - never an error. This is
//! the single place where that policy lives; the rule checks read the report
//! through these accessors and never touch raw JSON.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Scores from the nudity detection model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NudityScores {
    /// Probability of depicted sexual activity.
    pub sexual_activity: f64,
    /// Probability of sexual display.
    pub sexual_display: f64,
    /// Probability of erotica.
    pub erotica: f64,
}

/// Text extracted from the image by the OCR model.
///
/// The provider omits `content` entirely when no text was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DetectedText {
    pub content: String,
}

/// Emotion probabilities for a detected face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FaceAttributes {
    pub sorrow: f64,
    pub anger: f64,
}

/// A single detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Face {
    pub attributes: FaceAttributes,
}

/// The multi-model analysis report for one image.
///
/// Any subset of fields may be absent in the provider response; missing
/// fields deserialize to their defaults. Fields this service does not
/// understand are ignored here - callers that need the full detail render
/// the raw JSON carried alongside this typed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AnalysisReport {
    /// Nudity model scores.
    pub nudity: NudityScores,
    /// Probability that a weapon is depicted.
    pub weapon: f64,
    /// Probability that alcohol is depicted.
    pub alcohol: f64,
    /// Probability that drugs are depicted.
    pub drugs: f64,
    /// OCR text extraction result.
    pub text: DetectedText,
    /// Detected faces, in provider order.
    pub faces: Vec<Face>,
}

impl AnalysisReport {
    /// Parse a typed report out of a raw provider response.
    ///
    /// Unknown keys are ignored; missing keys take their defaults. Only a
    /// shape mismatch on a known key (e.g. `weapon` as an object) fails.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(raw.clone())
    }

    /// Combined explicit-content score: the worst of the three nudity
    /// sub-scores.
    pub fn explicit_score(&self) -> f64 {
        self.nudity
            .sexual_activity
            .max(self.nudity.sexual_display)
            .max(self.nudity.erotica)
    }

    /// Text detected in the image, empty when the OCR model found nothing.
    pub fn detected_text(&self) -> &str {
        &self.text.content
    }

    /// Attributes of the first detected face, if any.
    ///
    /// Faces beyond the first are ignored - the service moderates
    /// single-subject profile photos.
    pub fn primary_face(&self) -> Option<&FaceAttributes> {
        self.faces.first().map(|face| &face.attributes)
    }
}
