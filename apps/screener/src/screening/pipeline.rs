//! Ranking pipeline: scores every candidate against one job description and
//! returns a deterministic ranking plus the list of candidates that failed.
//!
//! Per-candidate lifecycle: `Pending → Extracted → Scored`, or `Pending → Failed`.
//! Failures are data, never errors: one bad document cannot stop the batch.
//! Candidates are independent and scored in parallel against a shared,
//! read-only `ModelBundle`.

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::screening::classifier::RoleClassifier;
use crate::screening::match_scoring::{identify_gap, MatchScorer, ScoringWeights};
use crate::screening::model::{ModelBundle, ModelError, TermVector};
use crate::screening::normalize::normalize;
use crate::screening::profile::{is_linkedin_profile, linkedin_sections};
use crate::screening::similarity::SimilarityScorer;
use crate::screening::skills::extract_from_normalized;
use crate::screening::vocabulary::{infer_skills, resolve_target_skills, SkillVocabulary};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A candidate document after text extraction. Empty `text` means extraction
/// produced nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateText {
    pub candidate_id: String,
    pub text: String,
}

/// The output unit of a ranking run. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub candidate_id: String,
    pub rank_score: f64,
    pub predicted_role: String,
    pub classifier_confidence: f64,
    pub semantic_similarity: f64,
    pub skill_match_percent: f64,
    pub skills_found: BTreeSet<String>,
    pub skill_gaps: BTreeSet<String>,
    pub linkedin_profile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    ExtractionEmpty,
    CandidateProcessingError { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub candidate_id: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Pending,
    Extracted,
    Scored,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Scored(MatchRecord),
    Failed(CandidateFailure),
}

impl CandidateOutcome {
    pub fn state(&self) -> CandidateState {
        match self {
            CandidateOutcome::Scored(_) => CandidateState::Scored,
            CandidateOutcome::Failed(_) => CandidateState::Failed,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("No candidate could be scored ({count} failed)", count = .failures.len())]
    EmptyBatch {
        failures: Vec<CandidateFailure>,
        warnings: Vec<String>,
    },
}

/// Everything a run computes once from the job description.
pub struct PreparedJob {
    pub vector: TermVector,
    pub target: SkillVocabulary,
    pub target_skills: BTreeSet<String>,
}

/// Result of a ranking run: every scored record in rank order, every failure,
/// and the warnings the caller should surface.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub target_skills: BTreeSet<String>,
    pub ranked: Vec<MatchRecord>,
    pub failures: Vec<CandidateFailure>,
    pub warnings: Vec<String>,
}

/// A thresholded, truncated view over a full ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankingView<'a> {
    pub results: Vec<&'a MatchRecord>,
    /// Scored candidates hidden by the minimum-score threshold.
    pub below_threshold: usize,
}

impl RankingReport {
    /// Applies `min_score` and `top_k` to the already-sorted ranking. Neither
    /// affects which candidates were scored.
    pub fn view(&self, min_score: f64, top_k: Option<usize>) -> RankingView<'_> {
        let passing: Vec<&MatchRecord> = self
            .ranked
            .iter()
            .filter(|r| r.rank_score >= min_score)
            .collect();
        let below_threshold = self.ranked.len() - passing.len();

        let results = match top_k {
            Some(k) => passing.into_iter().take(k).collect(),
            None => passing,
        };

        RankingView {
            results,
            below_threshold,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

pub struct RankingPipeline {
    bundle: ModelBundle,
    scorer: MatchScorer,
}

impl RankingPipeline {
    pub fn new(bundle: ModelBundle) -> Self {
        Self::with_weights(bundle, ScoringWeights::default())
    }

    pub fn with_weights(bundle: ModelBundle, weights: ScoringWeights) -> Self {
        Self {
            bundle,
            scorer: MatchScorer::new(weights),
        }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Normalizes and vectorizes the job description and fixes the run's
    /// target-skill set.
    pub fn prepare(&self, jd_text: &str, confirmed_skills: &[String]) -> PreparedJob {
        let base = self.bundle.base_vocabulary();
        let inferred = infer_skills(jd_text, base);
        let target = resolve_target_skills(confirmed_skills, base, &inferred);
        let vector = SimilarityScorer::new(self.bundle.vectorizer()).vectorize(&normalize(jd_text));

        PreparedJob {
            vector,
            target_skills: target.display_set(),
            target,
        }
    }

    /// Scores one candidate. Never panics and never returns an error: every
    /// problem becomes a `Failed` outcome.
    pub fn score_candidate(&self, job: &PreparedJob, candidate: &CandidateText) -> CandidateOutcome {
        let id = candidate.candidate_id.as_str();
        debug!(candidate_id = %id, state = ?CandidateState::Pending, "Scoring candidate");

        if candidate.text.trim().is_empty() {
            let outcome = CandidateOutcome::Failed(CandidateFailure {
                candidate_id: id.to_string(),
                reason: FailureReason::ExtractionEmpty,
            });
            warn!(
                candidate_id = %id,
                state = ?outcome.state(),
                "Could not extract text; excluded from ranking"
            );
            return outcome;
        }
        debug!(candidate_id = %id, state = ?CandidateState::Extracted, "Candidate text available");

        let attempt = catch_unwind(AssertUnwindSafe(|| self.try_score(job, candidate)));
        let failure = match attempt {
            Ok(Ok(record)) => {
                debug!(
                    candidate_id = %id,
                    state = ?CandidateState::Scored,
                    rank_score = record.rank_score,
                    "Candidate scored"
                );
                return CandidateOutcome::Scored(record);
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!(
            candidate_id = %id,
            state = ?CandidateState::Failed,
            error = %failure,
            "Candidate processing failed"
        );
        CandidateOutcome::Failed(CandidateFailure {
            candidate_id: id.to_string(),
            reason: FailureReason::CandidateProcessingError { message: failure },
        })
    }

    fn try_score(&self, job: &PreparedJob, candidate: &CandidateText) -> Result<MatchRecord, ModelError> {
        let linkedin_profile = is_linkedin_profile(&candidate.text);
        if linkedin_profile {
            let sections = linkedin_sections(&candidate.text);
            debug!(
                candidate_id = %candidate.candidate_id,
                summary_chars = sections.summary.len(),
                experience_chars = sections.experience.len(),
                top_skills = %sections.skills.replace('\n', ", "),
                "LinkedIn profile detected"
            );
        }

        let normalized = normalize(&candidate.text);

        let classification = RoleClassifier::new(&self.bundle).classify(&normalized)?;
        let skills_found = extract_from_normalized(&normalized, &job.target);
        let semantic_similarity =
            SimilarityScorer::new(self.bundle.vectorizer()).similarity_to(&job.vector, &normalized);
        let score = self
            .scorer
            .score(&job.target_skills, &skills_found, semantic_similarity);
        let skill_gaps = identify_gap(&job.target_skills, &skills_found);

        Ok(MatchRecord {
            candidate_id: candidate.candidate_id.clone(),
            rank_score: score.rank_score,
            predicted_role: classification.predicted_label,
            classifier_confidence: classification.confidence,
            semantic_similarity,
            skill_match_percent: score.skill_match_percent,
            skills_found,
            skill_gaps,
            linkedin_profile,
        })
    }

    /// Runs a full ranking.
    ///
    /// Returns `EmptyBatch` when no candidate reached `Scored`, which callers
    /// must tell apart from a ranking whose view is empty after thresholding.
    pub fn rank(
        &self,
        jd_text: &str,
        confirmed_skills: &[String],
        candidates: &[CandidateText],
    ) -> Result<RankingReport, ScreeningError> {
        let started = Instant::now();
        let run_id = Uuid::new_v4();
        let job = self.prepare(jd_text, confirmed_skills);

        let outcomes: Vec<CandidateOutcome> = candidates
            .par_iter()
            .map(|c| self.score_candidate(&job, c))
            .collect();

        let mut ranked = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Scored(record) => ranked.push(record),
                CandidateOutcome::Failed(failure) => failures.push(failure),
            }
        }
        sort_ranking(&mut ranked);
        failures.sort_by(|a, b| a.candidate_id.cmp(&b.candidate_id));

        let mut warnings: Vec<String> = self.bundle.warning().map(String::from).into_iter().collect();
        warnings.extend(failures.iter().filter_map(|f| match f.reason {
            FailureReason::ExtractionEmpty => Some(format!(
                "Could not extract text from {}. Please check file format.",
                f.candidate_id
            )),
            FailureReason::CandidateProcessingError { .. } => None,
        }));

        info!(
            run_id = %run_id,
            scored = ranked.len(),
            failed = failures.len(),
            target_skills = job.target_skills.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranking run complete"
        );

        if ranked.is_empty() {
            return Err(ScreeningError::EmptyBatch { failures, warnings });
        }

        Ok(RankingReport {
            run_id,
            generated_at: Utc::now(),
            target_skills: job.target_skills,
            ranked,
            failures,
            warnings,
        })
    }
}

/// Descending rank score; ties broken by ascending candidate id.
pub fn sort_ranking(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: unknown cause".to_string()
    }
}
