//! JSON API mirroring the two searches and the job detail page.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CatalogEntry, CompetencySelection, SelectionError};
use crate::errors::AppError;
use crate::matching::{self, MajorMatch, MajorQuery, StatsReport};
use crate::models::JobDetail;
use crate::scoring::RankedOccupation;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompetencySearchRequest {
    #[serde(default)]
    pub competencies: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MajorSearchRequest {
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub success: bool,
    pub jobs: Vec<T>,
    pub count: usize,
}

impl<T> SearchResponse<T> {
    fn new(jobs: Vec<T>) -> Self {
        Self {
            success: true,
            count: jobs.len(),
            jobs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: JobDetail,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// A body that is missing, not JSON, or the wrong shape is the same 400 the
/// caller would get for an empty selection.
fn parse_body<T>(
    body: Result<Json<T>, JsonRejection>,
    invalid: SelectionError,
) -> Result<T, AppError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            debug!("Rejected search body: {rejection}");
            Err(invalid.into())
        }
    }
}

/// POST /api/search/competencies
///
/// Exactly three known, distinct competency names. An empty `jobs` list is a
/// valid answer; an unreachable backend is a 5xx, never an empty list.
pub async fn handle_search_competencies(
    State(state): State<AppState>,
    body: Result<Json<CompetencySearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse<RankedOccupation>>, AppError> {
    let request = parse_body(body, SelectionError::WrongCount { got: 0 })?;
    let competencies = request.competencies.unwrap_or_default();
    let selection = CompetencySelection::new(&competencies, &state.catalog)?;
    let jobs = state
        .competency
        .search(&selection, state.config.result_limit)
        .await?;
    Ok(Json(SearchResponse::new(jobs)))
}

/// POST /api/search/majors
pub async fn handle_search_majors(
    State(state): State<AppState>,
    body: Result<Json<MajorSearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse<MajorMatch>>, AppError> {
    let request = parse_body(body, SelectionError::MissingMajor)?;
    let major = state
        .catalog
        .validate_major(request.major.as_deref().unwrap_or_default())?;
    let query = MajorQuery {
        min_score: request.min_score,
        max_results: request.max_results.or(state.config.result_limit),
    };
    let jobs = state.majors.search(&major, query).await?;
    Ok(Json(SearchResponse::new(jobs)))
}

/// GET /api/job/:code
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state
        .jobs
        .lookup(code.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(JobResponse { success: true, job }))
}

/// GET /api/competencies
pub async fn handle_competencies(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.competencies.clone())
}

/// GET /api/majors
pub async fn handle_majors(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.majors.clone())
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsReport>, AppError> {
    Ok(Json(matching::collect_stats(&state.store).await?))
}
