//! Role classifier: predicted role label plus confidence for one document.
//!
//! Advisory only: a bundle without a classifier yields the `Unknown` / 0.0
//! sentinel and scoring carries on.

use serde::{Deserialize, Serialize};

use crate::screening::match_scoring::round2;
use crate::screening::model::{ModelBundle, ModelError};

pub const UNKNOWN_ROLE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_label: String,
    /// Max class probability as a percentage, 2 decimals.
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            predicted_label: UNKNOWN_ROLE.to_string(),
            confidence: 0.0,
        }
    }

    #[cfg(test)]
    pub fn is_unknown(&self) -> bool {
        self.predicted_label == UNKNOWN_ROLE && self.confidence == 0.0
    }
}

pub struct RoleClassifier<'a> {
    bundle: &'a ModelBundle,
}

impl<'a> RoleClassifier<'a> {
    pub fn new(bundle: &'a ModelBundle) -> Self {
        Self { bundle }
    }

    /// Classifies already-normalized text.
    ///
    /// Errors only on a malformed model (shape or label mismatch); a missing
    /// classifier is not an error.
    pub fn classify(&self, normalized: &str) -> Result<ClassificationResult, ModelError> {
        let Some(classifier) = self.bundle.classifier() else {
            return Ok(ClassificationResult::unknown());
        };

        let features = self.bundle.vectorizer().transform(normalized);
        let probs = classifier.predict_proba(&features)?;

        // first maximum wins on ties
        let (class, max) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| {
                if p > best.1 {
                    (i, p)
                } else {
                    best
                }
            });
        let label = self.bundle.labels().decode(class)?;

        Ok(ClassificationResult {
            predicted_label: label.to_string(),
            confidence: round2(max * 100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::model::tests::sample_bundle;
    use crate::screening::normalize::normalize;
    use crate::screening::vocabulary::SkillVocabulary;

    #[test]
    fn test_predicts_data_science_for_python_spark() {
        let bundle = sample_bundle();
        let result = RoleClassifier::new(&bundle)
            .classify(&normalize("Python, SQL and Spark pipelines"))
            .unwrap();
        assert_eq!(result.predicted_label, "DATA-SCIENCE");
        assert!(result.confidence > 50.0 && result.confidence <= 100.0);
    }

    #[test]
    fn test_predicts_web_for_react() {
        let bundle = sample_bundle();
        let result = RoleClassifier::new(&bundle)
            .classify(&normalize("React React frontend"))
            .unwrap();
        assert_eq!(result.predicted_label, "WEB-DEVELOPER");
    }

    #[test]
    fn test_confidence_has_two_decimals() {
        let bundle = sample_bundle();
        let result = RoleClassifier::new(&bundle).classify("python").unwrap();
        assert_eq!(result.confidence, round2(result.confidence));
    }

    #[test]
    fn test_no_classifier_returns_unknown_sentinel() {
        let bundle = ModelBundle::degraded(SkillVocabulary::default_base(), "missing");
        let result = RoleClassifier::new(&bundle).classify("python sql").unwrap();
        assert_eq!(result, ClassificationResult::unknown());
        assert!(result.is_unknown());
    }

    #[test]
    fn test_unrecognized_text_uses_intercepts() {
        let bundle = sample_bundle();
        let result = RoleClassifier::new(&bundle).classify("").unwrap();
        // equal intercepts → uniform, first class wins
        assert_eq!(result.predicted_label, "DATA-SCIENCE");
        assert_eq!(result.confidence, 50.0);
    }
}
