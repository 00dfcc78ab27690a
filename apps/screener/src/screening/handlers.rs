//! Axum route handlers for the Screening API.

use std::collections::{BTreeSet, HashSet};

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::pipeline::{CandidateFailure, CandidateText, MatchRecord};
use crate::screening::vocabulary::{infer_skills, SkillVocabulary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BaseSkillsResponse {
    pub skills: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct InferSkillsRequest {
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct InferSkillsResponse {
    /// Base skills the job description mentions; the suggested default.
    pub inferred: BTreeSet<String>,
    /// Everything the caller may confirm: base ∪ inferred.
    pub options: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextScreeningRequest {
    pub jd_text: String,
    #[serde(default)]
    pub target_skills: Vec<String>,
    pub candidates: Vec<CandidateText>,
    pub min_score: Option<f64>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub target_skills: BTreeSet<String>,
    pub total_scored: usize,
    pub below_threshold: usize,
    pub results: Vec<MatchRecord>,
    pub failures: Vec<CandidateFailure>,
    pub warnings: Vec<String>,
}

/// Screening parameters shared by the JSON and multipart endpoints.
struct ScreeningJob {
    jd_text: String,
    target_skills: Vec<String>,
    candidates: Vec<CandidateText>,
    min_score: Option<f64>,
    top_k: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills
pub async fn handle_base_skills(State(state): State<AppState>) -> Json<BaseSkillsResponse> {
    Json(BaseSkillsResponse {
        skills: state.pipeline.bundle().base_vocabulary().display_set(),
    })
}

/// POST /api/v1/skills/infer
///
/// Suggests target skills for a job description before screening.
pub async fn handle_infer_skills(
    State(state): State<AppState>,
    Json(request): Json<InferSkillsRequest>,
) -> Result<Json<InferSkillsResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let base = state.pipeline.bundle().base_vocabulary();
    let inferred = infer_skills(&request.jd_text, base);
    let options = base.union(&SkillVocabulary::new(&inferred)).display_set();

    Ok(Json(InferSkillsResponse { inferred, options }))
}

/// POST /api/v1/screenings/text
///
/// Ranks candidates whose text the caller already extracted.
pub async fn handle_screen_text(
    State(state): State<AppState>,
    Json(request): Json<TextScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let job = ScreeningJob {
        jd_text: request.jd_text,
        target_skills: request.target_skills,
        candidates: request.candidates,
        min_score: request.min_score,
        top_k: request.top_k,
    };
    Ok(Json(run_screening(&state, job).await?))
}

/// POST /api/v1/screenings
///
/// Multipart form: `jd_text`, repeated `target_skill` (or comma-separated
/// `target_skills`), optional `min_score` / `top_k`, and one or more `files`.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut jd_text = String::new();
    let mut target_skills = Vec::new();
    let mut min_score = None;
    let mut top_k = None;
    let mut candidates = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jd_text" => jd_text = field.text().await?,
            "target_skill" => target_skills.push(field.text().await?),
            "target_skills" => target_skills.extend(
                field
                    .text()
                    .await?
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            ),
            "min_score" => min_score = Some(parse_field::<f64>("min_score", &field.text().await?)?),
            "top_k" => top_k = Some(parse_field::<usize>("top_k", &field.text().await?)?),
            "files" | "file" => {
                let filename = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::Validation("file part is missing a filename".to_string()))?;
                let bytes = field.bytes().await?;
                let text = extract_bounded(&state, bytes, &filename).await;
                candidates.push(CandidateText {
                    candidate_id: filename,
                    text,
                });
            }
            other => warn!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let job = ScreeningJob {
        jd_text,
        target_skills,
        candidates,
        min_score,
        top_k,
    };
    Ok(Json(run_screening(&state, job).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::Validation(format!("{name} has invalid value '{raw}'")))
}

/// Runs the extractor under the configured size and time bounds. Any failure
/// yields empty text, which the pipeline reports as `ExtractionEmpty`.
///
/// The timeout only stops waiting. PDF and DOCX parsing run on the blocking
/// pool and cannot be cancelled, so a pathological document keeps its thread
/// busy until the parser returns.
async fn extract_bounded(state: &AppState, bytes: Bytes, filename: &str) -> String {
    if bytes.len() > state.config.max_upload_bytes {
        warn!(
            filename = %filename,
            size = bytes.len(),
            limit = state.config.max_upload_bytes,
            "Document exceeds upload limit; skipping extraction"
        );
        return String::new();
    }

    let extraction = tokio::time::timeout(
        state.config.extraction_timeout,
        state.extractor.extract_text(bytes, filename),
    )
    .await;

    match extraction {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(filename = %filename, error = %e, "Text extraction failed");
            String::new()
        }
        Err(_) => {
            warn!(filename = %filename, "Text extraction timed out");
            String::new()
        }
    }
}

async fn run_screening(state: &AppState, job: ScreeningJob) -> Result<ScreeningResponse, AppError> {
    if job.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    if job.candidates.is_empty() {
        return Err(AppError::Validation(
            "at least one candidate document is required".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = job
        .candidates
        .iter()
        .find(|c| !seen.insert(c.candidate_id.as_str()))
    {
        return Err(AppError::Validation(format!(
            "duplicate candidate_id '{}'",
            dup.candidate_id
        )));
    }
    if let Some(score) = job.min_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(AppError::Validation(
                "min_score must be between 0 and 100".to_string(),
            ));
        }
    }

    let min_score = job.min_score.unwrap_or(state.config.default_min_score);
    let top_k = job.top_k.unwrap_or(state.config.default_top_k);

    // ranking is CPU-bound; keep it off the async executor
    let pipeline = state.pipeline.clone();
    let report = tokio::task::spawn_blocking(move || {
        pipeline.rank(&job.jd_text, &job.target_skills, &job.candidates)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in ranking: {e}")))??;

    let view = report.view(min_score, Some(top_k));
    let below_threshold = view.below_threshold;
    let results: Vec<MatchRecord> = view.results.into_iter().cloned().collect();

    Ok(ScreeningResponse {
        run_id: report.run_id,
        generated_at: report.generated_at,
        total_scored: report.ranked.len(),
        below_threshold,
        results,
        target_skills: report.target_skills,
        failures: report.failures,
        warnings: report.warnings,
    })
}
