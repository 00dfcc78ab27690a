//! Linear multi-class classifier with softmax probabilities.

use serde::{Deserialize, Serialize};

use crate::screening::model::vector::TermVector;
use crate::screening::model::{Classifier, ModelError};

/// Per-class weight rows plus intercepts, as exported to `classifier.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LinearClassifier {
    #[cfg(test)]
    pub fn new(coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self, ModelError> {
        let classifier = Self {
            coefficients,
            intercepts,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::Invalid {
            artifact: "classifier",
            reason,
        };

        if self.coefficients.is_empty() {
            return Err(invalid("no classes".to_string()));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(invalid(format!(
                "{} intercepts for {} classes",
                self.intercepts.len(),
                self.coefficients.len()
            )));
        }
        let width = self.coefficients[0].len();
        if width == 0 || self.coefficients.iter().any(|row| row.len() != width) {
            return Err(invalid("coefficient rows must be non-empty and equal length".to_string()));
        }
        if self
            .coefficients
            .iter()
            .flatten()
            .chain(&self.intercepts)
            .any(|w| !w.is_finite())
        {
            return Err(invalid("weights must be finite".to_string()));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn n_classes(&self) -> usize {
        self.coefficients.len()
    }

    fn n_features(&self) -> usize {
        self.coefficients[0].len()
    }

    fn predict_proba(&self, features: &TermVector) -> Result<Vec<f64>, ModelError> {
        if features.dimension() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                got: features.dimension(),
            });
        }

        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, bias)| {
                features
                    .entries()
                    .iter()
                    .map(|(col, w)| row[*col] * w)
                    .sum::<f64>()
                    + bias
            })
            .collect();

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|e| e / total).collect())
    }
}
