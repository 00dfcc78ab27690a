//! Semantic similarity between a job description and a candidate, measured as
//! the cosine of their term vectors under the bundle's vectorizer.

use crate::screening::match_scoring::round2;
use crate::screening::model::{TermVector, Vectorizer};

pub struct SimilarityScorer<'a> {
    vectorizer: &'a dyn Vectorizer,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(vectorizer: &'a dyn Vectorizer) -> Self {
        Self { vectorizer }
    }

    /// Projects normalized text into the shared vector space.
    pub fn vectorize(&self, normalized: &str) -> TermVector {
        self.vectorizer.transform(normalized)
    }

    /// Similarity of two normalized texts as a percentage in [0, 100].
    pub fn similarity(&self, jd_normalized: &str, candidate_normalized: &str) -> f64 {
        self.similarity_to(&self.vectorize(jd_normalized), candidate_normalized)
    }

    /// Like [`Self::similarity`] with the job description already vectorized,
    /// so a run projects the JD once.
    pub fn similarity_to(&self, jd_vector: &TermVector, candidate_normalized: &str) -> f64 {
        let candidate = self.vectorize(candidate_normalized);
        round2(jd_vector.cosine(&candidate) * 100.0)
    }
}
