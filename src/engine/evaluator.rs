//! Moderation Evaluator - applies the ordered rule checks.
//!
//! A pure, total function over `(AnalysisReport, Thresholds)`: no I/O, no
//! state, safe to call concurrently. Each rule runs regardless of earlier
//! outcomes and appends at most one reason; the reasons list preserves the
//! fixed rule order.

use regex::Regex;

use crate::domain::{AnalysisReport, EvaluationResult, FaceEmotionReadout, Thresholds};

/// A rule that was triggered during evaluation.
#[derive(Debug, Clone)]
pub struct RuleHit {
    /// Stable identifier for the rule.
    pub rule_id: &'static str,
    /// Human-readable justification.
    pub description: String,
}

/// Applies the moderation ruleset to an analysis report.
pub struct ModerationEvaluator {
    /// Matches a run of 5 or more consecutive decimal digits.
    digit_run: Regex,
}

impl ModerationEvaluator {
    pub fn new() -> Self {
        let digit_run = Regex::new(r"\d{5,}").expect("digit-run pattern is valid");
        Self { digit_run }
    }

    /// Evaluate a report against the given thresholds.
    ///
    /// Rule order, and therefore reason order:
    /// 1. Explicit content (nudity model)
    /// 2. Weapon
    /// 3. Alcohol
    /// 4. Drugs
    /// 5. Contact leak (OCR text)
    /// 6. Emotional coercion (primary face)
    pub fn evaluate(&self, report: &AnalysisReport, thresholds: &Thresholds) -> EvaluationResult {
        let checks = [
            self.check_explicit_content(report, thresholds),
            self.check_weapon(report, thresholds),
            self.check_alcohol(report, thresholds),
            self.check_drugs(report, thresholds),
            self.check_contact_leak(report),
            self.check_face_emotion(report, thresholds),
        ];

        let hits: Vec<RuleHit> = checks.into_iter().flatten().collect();

        let face_emotion = report.primary_face().map(|attributes| FaceEmotionReadout {
            sorrow: attributes.sorrow,
            anger: attributes.anger,
        });

        let result = if hits.is_empty() {
            EvaluationResult::approved()
        } else {
            let (rule_hits, reasons): (Vec<String>, Vec<String>) = hits
                .into_iter()
                .map(|hit| (hit.rule_id.to_string(), hit.description))
                .unzip();
            EvaluationResult::rejected(reasons, rule_hits)
        };

        result.with_face_emotion(face_emotion)
    }

    /// Rule 1: worst nudity sub-score at or above the adult threshold.
    fn check_explicit_content(
        &self,
        report: &AnalysisReport,
        thresholds: &Thresholds,
    ) -> Option<RuleHit> {
        let score = report.explicit_score();
        (score >= thresholds.adult).then(|| RuleHit {
            rule_id: "NUDITY_EXPLICIT",
            description: format!("Explicit adult content detected (score: {:.2})", score),
        })
    }

    /// Rule 2: weapon score at or above the weapon threshold.
    fn check_weapon(&self, report: &AnalysisReport, thresholds: &Thresholds) -> Option<RuleHit> {
        (report.weapon >= thresholds.weapon).then(|| RuleHit {
            rule_id: "WEAPON_DETECTED",
            description: format!("Safety risk (weapon) detected (score: {:.2})", report.weapon),
        })
    }

    /// Rule 3: alcohol score at or above the alcohol threshold.
    fn check_alcohol(&self, report: &AnalysisReport, thresholds: &Thresholds) -> Option<RuleHit> {
        (report.alcohol >= thresholds.alcohol).then(|| RuleHit {
            rule_id: "ALCOHOL_DETECTED",
            description: format!("Alcohol content detected (score: {:.2})", report.alcohol),
        })
    }

    /// Rule 4: drugs score at or above the drugs threshold.
    fn check_drugs(&self, report: &AnalysisReport, thresholds: &Thresholds) -> Option<RuleHit> {
        (report.drugs >= thresholds.drugs).then(|| RuleHit {
            rule_id: "DRUGS_DETECTED",
            description: format!("Drugs content detected (score: {:.2})", report.drugs),
        })
    }

    /// Rule 5: contact information embedded in the extracted text.
    ///
    /// Case-insensitive scan for messenger references, an '@' handle, or a
    /// run of 5+ digits (phone numbers). The reason quotes the original
    /// text verbatim so reviewers see exactly what leaked.
    fn check_contact_leak(&self, report: &AnalysisReport) -> Option<RuleHit> {
        let detected_text = report.detected_text();
        let folded = detected_text.to_lowercase();

        let leaks = folded.contains("whatsapp")
            || folded.contains("whats")
            || folded.contains('@')
            || self.digit_run.is_match(&folded);

        leaks.then(|| RuleHit {
            rule_id: "TEXT_CONTACT_LEAK",
            description: format!(
                "Contact information (phone/@) detected in image text: '{}'",
                detected_text
            ),
        })
    }

    /// Rule 6: negative emotion on the primary face.
    ///
    /// Only the first face is examined - the single-subject profile-photo
    /// use case.
    fn check_face_emotion(
        &self,
        report: &AnalysisReport,
        thresholds: &Thresholds,
    ) -> Option<RuleHit> {
        let attributes = report.primary_face()?;
        let flagged =
            attributes.sorrow >= thresholds.emotion || attributes.anger >= thresholds.emotion;

        flagged.then(|| RuleHit {
            rule_id: "FACE_NEGATIVE_EMOTION",
            description: "HUMAN RISK: image flagged (negative emotion detected).".to_string(),
        })
    }
}

impl Default for ModerationEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Verdict, GUIDELINES_SATISFIED};

    fn calibrated() -> Thresholds {
        Thresholds {
            adult: 0.80,
            weapon: 0.50,
            alcohol: 0.90,
            drugs: 0.90,
            emotion: 0.75,
        }
    }

    fn report(raw: serde_json::Value) -> AnalysisReport {
        AnalysisReport::from_value(&raw).unwrap()
    }

    #[test]
    fn test_all_defaults_approved() {
        let evaluator = ModerationEvaluator::new();
        let result = evaluator.evaluate(&AnalysisReport::default(), &calibrated());

        assert_eq!(result.verdict, Verdict::Approved);
        assert_eq!(result.reasons, vec![GUIDELINES_SATISFIED.to_string()]);
        assert!(result.rule_hits.is_empty());
        assert!(result.face_emotion.is_none());
    }

    #[test]
    fn test_rejection_scenario_preserves_rule_order() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "nudity": { "sexual_activity": 0.92 },
            "weapon": 0.1,
            "text": { "content": "contact me at 555512345" },
            "faces": []
        }));

        let result = evaluator.evaluate(&report, &calibrated());

        assert_eq!(result.verdict, Verdict::Rejected);
        assert_eq!(
            result.rule_hits,
            vec!["NUDITY_EXPLICIT", "TEXT_CONTACT_LEAK"]
        );
        assert!(result.reasons[0].contains("0.92"));
        assert!(result.reasons[1].contains("contact me at 555512345"));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({ "weapon": 0.50 }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(result.rule_hits, vec!["WEAPON_DETECTED"]);
    }

    #[test]
    fn test_raising_threshold_above_score_untrips_rule() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({ "weapon": 0.50 }));
        let thresholds = Thresholds {
            weapon: 0.51,
            ..calibrated()
        };

        let result = evaluator.evaluate(&report, &thresholds);
        assert_eq!(result.verdict, Verdict::Approved);
    }

    #[test]
    fn test_missing_threshold_never_triggers() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "nudity": { "sexual_activity": 0.99 },
            "weapon": 0.99,
            "alcohol": 0.99,
            "drugs": 0.99
        }));

        // Deserialized from a mapping with every category key absent.
        let thresholds: Thresholds = serde_json::from_str("{}").unwrap();
        let result = evaluator.evaluate(&report, &thresholds);
        assert_eq!(result.verdict, Verdict::Approved);
    }

    #[test]
    fn test_rules_are_independent() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "nudity": { "erotica": 0.95 },
            "weapon": 0.9,
            "alcohol": 0.95,
            "drugs": 0.95,
            "text": { "content": "find me on whatsapp" },
            "faces": [ { "attributes": { "sorrow": 0.9, "anger": 0.0 } } ]
        }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(
            result.rule_hits,
            vec![
                "NUDITY_EXPLICIT",
                "WEAPON_DETECTED",
                "ALCOHOL_DETECTED",
                "DRUGS_DETECTED",
                "TEXT_CONTACT_LEAK",
                "FACE_NEGATIVE_EMOTION",
            ]
        );
        assert_eq!(result.reasons.len(), 6);
    }

    #[test]
    fn test_contact_leak_is_case_insensitive() {
        let evaluator = ModerationEvaluator::new();
        let thresholds = calibrated();

        for content in ["WhatsApp: 555-1234", "whatsapp: 555-1234"] {
            let report = report(serde_json::json!({ "text": { "content": content } }));
            let result = evaluator.evaluate(&report, &thresholds);
            assert_eq!(result.rule_hits, vec!["TEXT_CONTACT_LEAK"]);
            // The reason quotes the original casing.
            assert!(result.reasons[0].contains(content));
        }
    }

    #[test]
    fn test_at_sign_triggers_contact_leak() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({ "text": { "content": "me@mail.example" } }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(result.rule_hits, vec!["TEXT_CONTACT_LEAK"]);
    }

    #[test]
    fn test_digit_run_boundary() {
        let evaluator = ModerationEvaluator::new();
        let thresholds = calibrated();

        let four = report(serde_json::json!({ "text": { "content": "room 1234" } }));
        assert_eq!(
            evaluator.evaluate(&four, &thresholds).verdict,
            Verdict::Approved
        );

        let five = report(serde_json::json!({ "text": { "content": "room 12345" } }));
        assert_eq!(
            evaluator.evaluate(&five, &thresholds).rule_hits,
            vec!["TEXT_CONTACT_LEAK"]
        );
    }

    #[test]
    fn test_only_first_face_is_examined() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "faces": [
                { "attributes": { "sorrow": 0.1, "anger": 0.1 } },
                { "attributes": { "sorrow": 0.1, "anger": 0.99 } },
                { "attributes": { "sorrow": 0.1, "anger": 0.1 } }
            ]
        }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(result.verdict, Verdict::Approved);
    }

    #[test]
    fn test_face_emotion_readout_recorded_without_affecting_verdict() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "faces": [ { "attributes": { "sorrow": 0.2, "anger": 0.3 } } ]
        }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(result.verdict, Verdict::Approved);

        let readout = result.face_emotion.unwrap();
        assert_eq!(readout.sorrow, 0.2);
        assert_eq!(readout.anger, 0.3);
    }

    #[test]
    fn test_sorrow_alone_triggers_emotion_rule() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "faces": [ { "attributes": { "sorrow": 0.8, "anger": 0.0 } } ]
        }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert_eq!(result.rule_hits, vec!["FACE_NEGATIVE_EMOTION"]);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({
            "nudity": { "sexual_display": 0.85 },
            "text": { "content": "call 987654321" }
        }));
        let thresholds = calibrated();

        let first = evaluator.evaluate(&report, &thresholds);
        let second = evaluator.evaluate(&report, &thresholds);

        assert_eq!(first.verdict, second.verdict);
        assert_eq!(first.reasons, second.reasons);
        assert_eq!(first.rule_hits, second.rule_hits);
        assert_eq!(first.face_emotion, second.face_emotion);
    }

    #[test]
    fn test_score_formatted_to_two_decimals() {
        let evaluator = ModerationEvaluator::new();
        let report = report(serde_json::json!({ "alcohol": 0.912345 }));

        let result = evaluator.evaluate(&report, &calibrated());
        assert!(result.reasons[0].contains("0.91"));
        assert!(!result.reasons[0].contains("0.912"));
    }
}
