//! Threshold configuration domain types.
//!
//! Operator-calibrated probability cutoffs, one per violation category. A
//! score at or above its threshold triggers the corresponding rule.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Threshold for a category the operator left unset: a probability can never
/// reach above 1.0, so the rule never triggers.
fn never_trigger() -> f64 {
    1.0
}

/// Probability cutoffs for the five violation categories.
///
/// Each value must lie in `[0.0, 1.0]`. A partial mapping deserializes with
/// the missing categories set to the never-trigger threshold of 1.0 -
/// misconfiguration disables a rule, it never fails an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Thresholds {
    /// Explicit adult content (worst of the nudity sub-scores).
    #[serde(default = "never_trigger")]
    pub adult: f64,
    /// Weapon depiction.
    #[serde(default = "never_trigger")]
    pub weapon: f64,
    /// Alcohol depiction.
    #[serde(default = "never_trigger")]
    pub alcohol: f64,
    /// Drugs depiction.
    #[serde(default = "never_trigger")]
    pub drugs: f64,
    /// Negative emotion (sorrow or anger) on the primary face.
    #[serde(default = "never_trigger")]
    pub emotion: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            adult: never_trigger(),
            weapon: never_trigger(),
            alcohol: never_trigger(),
            drugs: never_trigger(),
            emotion: never_trigger(),
        }
    }
}

impl Thresholds {
    /// Validate that every threshold is a probability in `[0.0, 1.0]`.
    ///
    /// Meant for the API boundary; evaluation itself is total and never
    /// rejects a threshold set.
    pub fn validate(&self) -> Result<(), String> {
        for (category, value) in self.entries() {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(format!(
                    "threshold '{}' must be in [0.0, 1.0], got {}",
                    category, value
                ));
            }
        }
        Ok(())
    }

    /// Category name / value pairs in rule order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("adult", self.adult),
            ("weapon", self.weapon),
            ("alcohol", self.alcohol),
            ("drugs", self.drugs),
            ("emotion", self.emotion),
        ]
    }

    /// Bit-exact representation of the five values, suitable for keying a
    /// memoization cache. Thresholds affect the outcome, so they must be
    /// part of any cache key.
    pub fn cache_bits(&self) -> [u64; 5] {
        [
            self.adult.to_bits(),
            self.weapon.to_bits(),
            self.alcohol.to_bits(),
            self.drugs.to_bits(),
            self.emotion.to_bits(),
        ]
    }
}
