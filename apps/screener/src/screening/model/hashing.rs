//! Vocabulary-free fallback vectorizer used when no trained vectorizer could be
//! loaded. Keeps semantic similarity available in degraded mode.

use std::collections::HashMap;

use crate::screening::model::vector::TermVector;
use crate::screening::model::Vectorizer;
use crate::screening::normalize::tokens;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// Hashes unigram and bigram counts into `2^bits` columns, L2-normalized.
#[derive(Debug, Clone)]
pub struct HashingVectorizer {
    bits: u32,
}

impl HashingVectorizer {
    pub const DEFAULT_BITS: u32 = 20;

    fn column(&self, gram: &str) -> usize {
        (fnv1a(gram.as_bytes()) & ((1u64 << self.bits) - 1)) as usize
    }
}

impl Default for HashingVectorizer {
    fn default() -> Self {
        Self {
            bits: Self::DEFAULT_BITS,
        }
    }
}

impl Vectorizer for HashingVectorizer {
    fn dimension(&self) -> usize {
        1usize << self.bits
    }

    fn transform(&self, normalized: &str) -> TermVector {
        let words: Vec<&str> = tokens(normalized).collect();
        let mut counts: HashMap<usize, f64> = HashMap::new();

        for word in &words {
            *counts.entry(self.column(word)).or_insert(0.0) += 1.0;
        }
        for pair in words.windows(2) {
            *counts.entry(self.column(&pair.join(" "))).or_insert(0.0) += 1.0;
        }

        TermVector::from_pairs(self.dimension(), counts).l2_normalized()
    }
}
