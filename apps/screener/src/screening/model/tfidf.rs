//! TF-IDF vectorizer over a fixed, trained vocabulary.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::screening::model::vector::TermVector;
use crate::screening::model::{ModelError, Vectorizer};
use crate::screening::normalize::tokens;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF vectorizer, as exported to `vectorizer.json`.
///
/// Term weight is `tf * idf`, with `tf` replaced by `1 + ln(tf)` when
/// `sublinear_tf` is set. Tokens shorter than two characters and stop words are
/// skipped before n-grams are formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    stop_words: HashSet<String>,
    #[serde(default)]
    norm: Norm,
}

impl TfidfVectorizer {
    #[cfg(test)]
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        ngram_range: (usize, usize),
        sublinear_tf: bool,
    ) -> Result<Self, ModelError> {
        let vectorizer = Self {
            vocabulary,
            idf,
            ngram_range,
            sublinear_tf,
            stop_words: HashSet::new(),
            norm: Norm::L2,
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Checks internal consistency of a deserialized artifact.
    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::Invalid {
            artifact: "vectorizer",
            reason,
        };

        if self.vocabulary.is_empty() {
            return Err(invalid("vocabulary is empty".to_string()));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(invalid(format!(
                "idf has {} weights for {} vocabulary terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        if let Some((term, col)) = self.vocabulary.iter().find(|(_, c)| **c >= self.idf.len()) {
            return Err(invalid(format!("term '{term}' maps to out-of-range column {col}")));
        }
        if self.idf.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("idf weights must be finite and non-negative".to_string()));
        }
        let (lo, hi) = self.ngram_range;
        if lo == 0 || lo > hi {
            return Err(invalid(format!("bad ngram_range ({lo}, {hi})")));
        }
        Ok(())
    }

    fn analyze<'a>(&self, normalized: &'a str) -> Vec<String> {
        let words: Vec<&'a str> = tokens(normalized)
            .filter(|t| t.len() >= 2 && !self.stop_words.contains(*t))
            .collect();

        let (lo, hi) = self.ngram_range;
        let mut grams = Vec::new();
        for n in lo..=hi {
            if n > words.len() {
                break;
            }
            grams.extend(words.windows(n).map(|w| w.join(" ")));
        }
        grams
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, normalized: &str) -> TermVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for gram in self.analyze(normalized) {
            if let Some(&col) = self.vocabulary.get(&gram) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let weighted = counts.into_iter().map(|(col, tf)| {
            let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
            (col, tf * self.idf[col])
        });

        let vector = TermVector::from_pairs(self.dimension(), weighted);
        match self.norm {
            Norm::L2 => vector.l2_normalized(),
            Norm::None => vector,
        }
    }
}
