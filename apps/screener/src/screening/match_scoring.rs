//! Match scoring: blends skill overlap and semantic similarity into one
//! composite rank score, and lists the skills a candidate is missing.
//!
//! rank_score = round(w_semantic × similarity + w_skills × skill_ratio × 100, 2)
//!
//! The default weighting is 50/50. An empty target-skill set imposes no skill
//! constraint and counts as a perfect skill match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Rounds to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub skills: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.5,
            skills: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub rank_score: f64,
    pub skill_match_percent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: ScoringWeights,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// `semantic_similarity` is a percentage in [0, 100].
    pub fn score(
        &self,
        target_skills: &BTreeSet<String>,
        candidate_skills: &BTreeSet<String>,
        semantic_similarity: f64,
    ) -> MatchScore {
        let ratio = skill_match_ratio(target_skills, candidate_skills);
        let rank_score = round2(
            self.weights.semantic * semantic_similarity + self.weights.skills * ratio * 100.0,
        );

        MatchScore {
            rank_score: rank_score.clamp(0.0, 100.0),
            skill_match_percent: round2(ratio * 100.0),
        }
    }
}

/// |target ∩ candidate| / |target|, or 1.0 when there are no target skills.
pub fn skill_match_ratio(target: &BTreeSet<String>, candidate: &BTreeSet<String>) -> f64 {
    if target.is_empty() {
        return 1.0;
    }
    let matched = target.intersection(candidate).count();
    matched as f64 / target.len() as f64
}

/// Target skills the candidate lacks.
pub fn identify_gap(target: &BTreeSet<String>, candidate: &BTreeSet<String>) -> BTreeSet<String> {
    target.difference(candidate).cloned().collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_skill_match() {
        let t = set(&["Python", "Sql"]);
        let score = MatchScorer::default().score(&t, &set(&["Python", "Sql", "Docker"]), 80.0);
        assert_eq!(score.skill_match_percent, 100.0);
        assert_eq!(score.rank_score, 90.0);
    }

    #[test]
    fn test_partial_skill_match() {
        let t = set(&["Python", "Sql", "Aws"]);
        let score = MatchScorer::default().score(&t, &set(&["Python"]), 40.0);
        // 0.5*40 + 0.5*33.333.. = 36.666.. → 36.67
        assert_eq!(score.skill_match_percent, 33.33);
        assert_eq!(score.rank_score, 36.67);
    }

    #[test]
    fn test_empty_target_is_perfect_match() {
        let score = MatchScorer::default().score(&BTreeSet::new(), &BTreeSet::new(), 0.0);
        assert_eq!(score.skill_match_percent, 100.0);
        assert_eq!(score.rank_score, 50.0);
        assert_eq!(skill_match_ratio(&BTreeSet::new(), &set(&["Rust"])), 1.0);
    }

    #[test]
    fn test_gap_is_target_minus_found() {
        let t = set(&["Python", "Sql", "Aws"]);
        let c = set(&["Python", "React"]);
        assert_eq!(identify_gap(&t, &c), set(&["Aws", "Sql"]));
    }

    #[test]
    fn test_gap_empty_when_target_empty() {
        assert!(identify_gap(&BTreeSet::new(), &set(&["Python"])).is_empty());
    }

    fn skill_set() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[A-F][a-z]{0,2}", 0..8)
    }

    proptest! {
        #[test]
        fn test_ratio_bounded(t in skill_set(), c in skill_set()) {
            let r = skill_match_ratio(&t, &c);
            prop_assert!((0.0..=1.0).contains(&r), "ratio {} out of range", r);
            if t.is_empty() {
                prop_assert_eq!(r, 1.0);
            }
        }

        #[test]
        fn test_gap_disjoint_from_found_and_within_target(t in skill_set(), c in skill_set()) {
            let gap = identify_gap(&t, &c);
            prop_assert!(gap.is_disjoint(&c));
            prop_assert!(gap.is_subset(&t));
            prop_assert_eq!(gap.len(), t.len() - t.intersection(&c).count());
        }

        #[test]
        fn test_rank_score_monotonic_in_similarity(
            t in skill_set(),
            c in skill_set(),
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
        ) {
            let scorer = MatchScorer::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scorer.score(&t, &c, lo).rank_score <= scorer.score(&t, &c, hi).rank_score);
        }

        #[test]
        fn test_rank_score_monotonic_in_skill_ratio(
            t in skill_set(),
            c in skill_set(),
            extra in skill_set(),
            sim in 0.0f64..=100.0,
        ) {
            let scorer = MatchScorer::default();
            let more: BTreeSet<String> = c.union(&extra).cloned().collect();
            prop_assert!(skill_match_ratio(&t, &c) <= skill_match_ratio(&t, &more));
            prop_assert!(scorer.score(&t, &c, sim).rank_score <= scorer.score(&t, &more, sim).rank_score);
        }

        #[test]
        fn test_score_is_bounded_and_idempotent(
            t in skill_set(),
            c in skill_set(),
            sim in 0.0f64..=100.0,
        ) {
            let scorer = MatchScorer::default();
            let first = scorer.score(&t, &c, sim);
            prop_assert_eq!(first, scorer.score(&t, &c, sim));
            prop_assert!((0.0..=100.0).contains(&first.rank_score));
            prop_assert!((0.0..=100.0).contains(&first.skill_match_percent));
        }
    }

    #[test]
    fn test_custom_weights() {
        let scorer = MatchScorer::new(ScoringWeights {
            semantic: 1.0,
            skills: 0.0,
        });
        let score = scorer.score(&set(&["A"]), &set(&[]), 73.21);
        assert_eq!(score.rank_score, 73.21);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }
}
