//! Skill extractor: phrase-level matching of a vocabulary against a document.
//!
//! Matching runs on normalized tokens: a multi-word phrase matches only when its
//! tokens occur as a contiguous run. Nested phrases are all reported ("machine"
//! and "machine learning" both match "machine learning"); the vocabulary decides
//! granularity.

use std::collections::BTreeSet;

use crate::screening::normalize::{normalize, tokens};
use crate::screening::vocabulary::SkillVocabulary;

/// Extracts the distinct skills of `vocabulary` present in raw `text`,
/// in Title Case display form.
pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> BTreeSet<String> {
    extract_from_normalized(&normalize(text), vocabulary)
}

/// Same as [`extract_skills`] for text that already went through `normalize`.
pub fn extract_from_normalized(normalized: &str, vocabulary: &SkillVocabulary) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    if normalized.is_empty() || vocabulary.is_empty() {
        return found;
    }

    let doc: Vec<&str> = tokens(normalized).collect();

    for start in 0..doc.len() {
        for phrase in vocabulary.starting_with(doc[start]) {
            let end = start + phrase.tokens.len();
            if end > doc.len() {
                continue;
            }
            let matched = phrase
                .tokens
                .iter()
                .zip(&doc[start..end])
                .all(|(want, got)| want.as_str() == *got);
            if matched {
                found.insert(phrase.display.clone());
            }
        }
    }

    found
}
