//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{
    analyze_cv_ats_score, generate_cover_letter, generate_cv, generate_interview_qa, AtsReport,
    GenerateCvRequest, TARGET_MATCH_RANGE,
};
use crate::generation::keywords::{extract_key_metrics, keyword_match_report, KeyMetrics, KeywordMatchReport};
use crate::layout::page_limit::estimate_page_count;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateCvResponse {
    pub cv: String,
    pub estimated_pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub cv_content: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ats: AtsReport,
    pub keywords: KeywordMatchReport,
    pub metrics: KeyMetrics,
}

/// Résumé plus job description, shared by the cover letter and interview endpoints.
#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub interview_qa: String,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/generate
///
/// Generates an optimized CV, limited to the configured page count.
pub async fn handle_generate_cv(
    State(state): State<AppState>,
    Json(request): Json<GenerateCvRequest>,
) -> Result<Json<GenerateCvResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("job_description", &request.job_description)?;
    if !TARGET_MATCH_RANGE.contains(&request.target_match) {
        return Err(AppError::Validation(format!(
            "target_match must be between {} and {}",
            TARGET_MATCH_RANGE.start(),
            TARGET_MATCH_RANGE.end()
        )));
    }
    let provider = state.provider()?;

    let cv = generate_cv(provider, &request, state.config.max_pages).await?;
    let estimated_pages = estimate_page_count(&cv);
    info!(estimated_pages, "CV generation complete");

    Ok(Json(GenerateCvResponse {
        cv,
        estimated_pages,
    }))
}

/// POST /api/v1/cv/analyze
///
/// Model ATS report plus the deterministic keyword and metric counts.
/// The model part degrades to a zero report instead of failing.
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text("cv_content", &request.cv_content)?;
    require_text("job_description", &request.job_description)?;
    let provider = state.provider()?;

    let ats = analyze_cv_ats_score(provider, &request.cv_content, &request.job_description).await;

    Ok(Json(AnalyzeResponse {
        ats,
        keywords: keyword_match_report(&request.cv_content, &request.job_description),
        metrics: extract_key_metrics(&request.cv_content),
    }))
}

/// POST /api/v1/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("job_description", &request.job_description)?;
    let provider = state.provider()?;

    let cover_letter =
        generate_cover_letter(provider, &request.resume_text, &request.job_description).await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/v1/interview
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("job_description", &request.job_description)?;
    let provider = state.provider()?;

    let interview_qa =
        generate_interview_qa(provider, &request.resume_text, &request.job_description).await?;

    Ok(Json(InterviewResponse { interview_qa }))
}
