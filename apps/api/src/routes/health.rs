use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::matching::{self, HealthReport};
use crate::state::AppState;

/// GET /health
/// Liveness only: does not touch the data backend.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careers-web"
    }))
}

/// GET /api/health
/// Database connectivity and whether the mapping tables are populated.
pub async fn api_health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(matching::health(&state.store).await)
}
