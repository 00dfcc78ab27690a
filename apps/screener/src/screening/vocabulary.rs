//! Skill vocabulary: an immutable, case-insensitive, deduplicated set of skill
//! phrases built once per ranking run.
//!
//! A run's vocabulary is the static base vocabulary unioned with whatever the
//! job description itself mentions. It is never mutated while candidates are
//! being matched; extending it means building a new snapshot.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::screening::normalize::{normalize, title_case, tokens};
use crate::screening::skills::extract_skills;

/// Default base vocabulary used when no `skills.json` artifact is available.
pub const DEFAULT_BASE_SKILLS: &[&str] = &[
    "python",
    "java",
    "sql",
    "react",
    "leadership",
    "management",
    "aws",
    "azure",
    "docker",
    "machine learning",
];

/// One canonical skill phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPhrase {
    /// Normalized, lowercase form; the identity of the phrase.
    pub key: String,
    /// Token sequence that must occur contiguously in a document.
    pub tokens: Vec<String>,
    /// Title Case display form ("Machine Learning").
    pub display: String,
}

impl SkillPhrase {
    /// Canonicalizes a raw phrase. Returns `None` if nothing survives normalization
    /// (e.g. a phrase made only of punctuation).
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize(raw);
        if key.is_empty() {
            return None;
        }
        let tokens: Vec<String> = tokens(&key).map(String::from).collect();
        let display = title_case(&key);
        Some(Self { key, tokens, display })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillVocabulary {
    phrases: BTreeMap<String, SkillPhrase>,
    // first token → keys of phrases starting with it
    by_first_token: HashMap<String, Vec<String>>,
}

impl SkillVocabulary {
    pub fn new<I, S>(raw_phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: BTreeMap<String, SkillPhrase> = raw_phrases
            .into_iter()
            .filter_map(|p| SkillPhrase::parse(p.as_ref()))
            .map(|p| (p.key.clone(), p))
            .collect();

        let mut by_first_token: HashMap<String, Vec<String>> = HashMap::new();
        for phrase in phrases.values() {
            by_first_token
                .entry(phrase.tokens[0].clone())
                .or_default()
                .push(phrase.key.clone());
        }

        Self {
            phrases,
            by_first_token,
        }
    }

    /// Vocabulary holding `DEFAULT_BASE_SKILLS`.
    pub fn default_base() -> Self {
        Self::new(DEFAULT_BASE_SKILLS.iter().copied())
    }

    /// Builds a new snapshot containing the phrases of both vocabularies.
    pub fn union(&self, other: &SkillVocabulary) -> Self {
        Self::new(
            self.phrases
                .keys()
                .chain(other.phrases.keys())
                .map(String::as_str),
        )
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Case-insensitive membership test.
    #[cfg(test)]
    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.contains_key(&normalize(phrase))
    }

    /// Phrases whose first token is `token`.
    pub(crate) fn starting_with(&self, token: &str) -> impl Iterator<Item = &SkillPhrase> {
        self.by_first_token
            .get(token)
            .into_iter()
            .flatten()
            .filter_map(|key| self.phrases.get(key))
    }

    /// Display forms, sorted.
    pub fn display_set(&self) -> BTreeSet<String> {
        self.phrases.values().map(|p| p.display.clone()).collect()
    }
}

/// Bootstraps a job-specific vocabulary: the base phrases that literally occur
/// in the job description.
pub fn infer_skills(text: &str, base: &SkillVocabulary) -> BTreeSet<String> {
    extract_skills(text, base)
}

/// Resolves the target-skill set for a run.
///
/// Caller-confirmed skills win when any are given; otherwise the target is the
/// base vocabulary unioned with the skills inferred from the job description.
pub fn resolve_target_skills(
    confirmed: &[String],
    base: &SkillVocabulary,
    inferred: &BTreeSet<String>,
) -> SkillVocabulary {
    let confirmed = SkillVocabulary::new(confirmed);
    if !confirmed.is_empty() {
        return confirmed;
    }
    base.union(&SkillVocabulary::new(inferred))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_is_case_insensitive() {
        let vocab = SkillVocabulary::new(["Python", "python", "PYTHON", "SQL", "sql "]);
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("pYtHoN"));
        assert_eq!(
            vocab.display_set(),
            BTreeSet::from(["Python".to_string(), "Sql".to_string()])
        );
    }

    #[test]
    fn test_phrases_normalizing_to_nothing_are_dropped() {
        let vocab = SkillVocabulary::new(["++", "  ", "rust"]);
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_multi_token_phrase_tokens() {
        let phrase = SkillPhrase::parse("Machine  Learning").unwrap();
        assert_eq!(phrase.key, "machine learning");
        assert_eq!(phrase.tokens, vec!["machine", "learning"]);
        assert_eq!(phrase.display, "Machine Learning");
    }

    #[test]
    fn test_union_keeps_single_copy() {
        let a = SkillVocabulary::new(["Docker", "AWS"]);
        let b = SkillVocabulary::new(["aws", "Kubernetes"]);
        let merged = a.union(&b);
        assert_eq!(merged.len(), 3);
        assert!(merged.contains("kubernetes"));
    }

    #[test]
    fn test_infer_skills_from_jd() {
        let base = SkillVocabulary::default_base();
        let jd = "We need a Python engineer with SQL and Machine Learning experience.";
        let inferred = infer_skills(jd, &base);
        assert_eq!(
            inferred,
            BTreeSet::from([
                "Machine Learning".to_string(),
                "Python".to_string(),
                "Sql".to_string(),
            ])
        );
    }

    #[test]
    fn test_confirmed_skills_take_precedence() {
        let base = SkillVocabulary::default_base();
        let inferred = BTreeSet::from(["Python".to_string()]);
        let target = resolve_target_skills(&["Rust".to_string()], &base, &inferred);
        assert_eq!(target.display_set(), BTreeSet::from(["Rust".to_string()]));
    }

    #[test]
    fn test_empty_confirmation_falls_back_to_base_and_inferred() {
        let base = SkillVocabulary::new(["Python", "Java"]);
        let inferred = BTreeSet::from(["Kubernetes".to_string()]);
        let target = resolve_target_skills(&[], &base, &inferred);
        assert_eq!(target.len(), 3);
        assert!(target.contains("kubernetes"));
    }
}
