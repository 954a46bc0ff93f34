use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::SelectionError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show an end user.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Store(StoreError::NotConfigured) => {
                "Career data is unavailable: the app is running in demo mode".to_string()
            }
            AppError::Store(_) => "The career database could not be reached".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Store(StoreError::NotConfigured) => "BACKEND_UNAVAILABLE",
            AppError::Store(_) => "BACKEND_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Logs server-side failures; client errors are not worth an error line.
    pub fn log(&self) {
        match self {
            AppError::Store(StoreError::NotConfigured) => {
                tracing::warn!("Request needs data but no backend is configured")
            }
            AppError::Store(e) => tracing::error!("Store error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::NotFound(_) | AppError::Validation(_) => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_error_is_bad_request() {
        let err = AppError::from(SelectionError::WrongCount { got: 2 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Please select exactly 3 competencies");
    }

    #[test]
    fn test_store_errors_are_not_client_errors() {
        assert_eq!(
            AppError::from(StoreError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let api = StoreError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        let err = AppError::from(api);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(!err.public_message().contains("boom"));
    }
}
