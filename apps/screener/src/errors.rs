use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::pipeline::{CandidateFailure, ScreeningError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No candidate could be scored")]
    EmptyBatch {
        failures: Vec<CandidateFailure>,
        warnings: Vec<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ScreeningError> for AppError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::EmptyBatch { failures, warnings } => {
                AppError::EmptyBatch { failures, warnings }
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::Validation(format!("Malformed multipart body: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": msg
                    }
                }),
            ),
            AppError::EmptyBatch { failures, warnings } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": {
                        "code": "EMPTY_BATCH",
                        "message": "No candidate could be scored; nothing to rank",
                        "failures": failures,
                        "warnings": warnings
                    }
                }),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": {
                            "code": "INTERNAL_ERROR",
                            "message": "An internal server error occurred"
                        }
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
