//! Server-rendered pages. Errors render as HTML, not JSON.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::catalog::CompetencySelection;
use crate::errors::AppError;
use crate::matching::MajorQuery;
use crate::state::AppState;
use crate::store::BackendStatus;
use crate::views::{self, pages, pages::ResultRow};

/// An `AppError` rendered through the HTML error page.
pub struct PageError {
    error: AppError,
    status: BackendStatus,
}

impl PageError {
    fn new(error: impl Into<AppError>, state: &AppState) -> Self {
        Self {
            error: error.into(),
            status: state.backend_status,
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.error.log();
        let title = match &self.error {
            AppError::NotFound(_) => "Not Found",
            _ => "Error",
        };
        let html = views::layout(title, self.status, &pages::error(&self.error.public_message()));
        (self.error.status(), Html(html)).into_response()
    }
}

fn page(state: &AppState, title: &str, body: &str) -> Html<String> {
    Html(views::layout(title, state.backend_status, body))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetencyForm {
    pub first: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
}

impl CompetencyForm {
    fn picked(&self) -> [Option<&str>; 3] {
        [&self.first, &self.second, &self.third]
            .map(|v| v.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MajorForm {
    pub major: Option<String>,
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Html<String> {
    page(&state, "Home", &pages::home(&state.catalog))
}

/// GET /competencies
pub async fn competencies(State(state): State<AppState>) -> Html<String> {
    page(
        &state,
        "Find Careers by Competencies",
        &pages::competency_form(&state.catalog, [None; 3], None),
    )
}

/// GET /competencies/results?first=..&second=..&third=..
pub async fn competency_results(
    State(state): State<AppState>,
    Query(form): Query<CompetencyForm>,
) -> Result<Response, PageError> {
    let picked = form.picked();
    let selection = match CompetencySelection::new(picked.iter().flatten(), &state.catalog) {
        Ok(selection) => selection,
        Err(e) => {
            let body = pages::competency_form(&state.catalog, picked, Some(&e.to_string()));
            let html = page(&state, "Find Careers by Competencies", &body);
            return Ok((StatusCode::BAD_REQUEST, html).into_response());
        }
    };

    let jobs = state
        .competency
        .search(&selection, state.config.result_limit)
        .await
        .map_err(|e| PageError::new(e, &state))?;

    let heading = format!("Careers matching: {}", selection.label());
    let body = pages::results(&heading, jobs.iter().map(ResultRow::from), "/competencies");
    Ok(page(&state, &heading, &body).into_response())
}

/// GET /majors
pub async fn majors(State(state): State<AppState>) -> Html<String> {
    page(
        &state,
        "Find Careers by Major",
        &pages::major_form(&state.catalog, None, None),
    )
}

/// GET /majors/results?major=..
pub async fn major_results(
    State(state): State<AppState>,
    Query(form): Query<MajorForm>,
) -> Result<Response, PageError> {
    let requested = form.major.as_deref().unwrap_or_default();
    let major = match state.catalog.validate_major(requested) {
        Ok(major) => major,
        Err(e) => {
            let body = pages::major_form(&state.catalog, None, Some(&e.to_string()));
            let html = page(&state, "Find Careers by Major", &body);
            return Ok((StatusCode::BAD_REQUEST, html).into_response());
        }
    };

    let query = MajorQuery {
        min_score: None,
        max_results: state.config.result_limit,
    };
    let jobs = state
        .majors
        .search(&major, query)
        .await
        .map_err(|e| PageError::new(e, &state))?;

    let heading = format!("Careers related to {major}");
    let body = pages::results(&heading, jobs.iter().map(ResultRow::from), "/majors");
    Ok(page(&state, &heading, &body).into_response())
}

/// GET /job/:code
pub async fn job(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Html<String>, PageError> {
    let job = state
        .jobs
        .lookup(code.trim())
        .await
        .map_err(|e| PageError::new(e, &state))?
        .ok_or_else(|| {
            PageError::new(
                AppError::NotFound("The requested job could not be found".to_string()),
                &state,
            )
        })?;

    Ok(page(
        &state,
        &format!("Job Details - {}", job.title),
        &pages::job_detail(&job),
    ))
}

/// GET /about
pub async fn about(State(state): State<AppState>) -> Html<String> {
    page(&state, "About", &pages::about())
}

/// GET /contact
pub async fn contact(State(state): State<AppState>) -> Html<String> {
    page(&state, "Contact Us", &pages::contact())
}

/// Fallback for unknown routes.
pub async fn not_found(State(state): State<AppState>) -> PageError {
    PageError::new(
        AppError::NotFound("The requested page could not be found".to_string()),
        &state,
    )
}
