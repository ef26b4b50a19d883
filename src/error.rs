use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Validation failures of the pure distance and fee computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid tier config: {0}")]
    InvalidTierConfig(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("automatic delivery fee unavailable: {0}")]
    AutoFeeUnavailable(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Fee(FeeError::AutoFeeUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::Fee(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
