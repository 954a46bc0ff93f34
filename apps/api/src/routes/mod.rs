pub mod api;
pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(pages::home))
        .route("/competencies", get(pages::competencies))
        .route("/competencies/results", get(pages::competency_results))
        .route("/majors", get(pages::majors))
        .route("/majors/results", get(pages::major_results))
        .route("/job/:code", get(pages::job))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        // JSON API
        .route("/api/health", get(health::api_health_handler))
        .route("/api/competencies", get(api::handle_competencies))
        .route("/api/majors", get(api::handle_majors))
        .route("/api/stats", get(api::handle_stats))
        .route(
            "/api/search/competencies",
            post(api::handle_search_competencies),
        )
        .route("/api/search/majors", post(api::handle_search_majors))
        .route("/api/job/:code", get(api::handle_get_job))
        .nest_service("/static", static_dir)
        .fallback(pages::not_found)
        .with_state(state)
}
